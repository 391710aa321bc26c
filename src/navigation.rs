use {
    parking_lot::Mutex,
    std::{fmt, sync::Arc},
};

/// Common reference type for [Navigator].
pub type NavigatorRef = Arc<dyn Navigator>;

//
// Navigator
//

/// Where the user is, and a way to send them elsewhere.
///
/// The pipeline never renders anything. It only asks the host application to navigate.
pub trait Navigator
where
    Self: fmt::Debug + Send + Sync,
{
    /// Current location (a route path, e.g. "/clusters").
    fn current_location(&self) -> String;

    /// Navigate.
    fn navigate(&self, redirect: Redirect);
}

//
// Redirect
//

/// Redirect requested by the pipeline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Redirect {
    /// Login page.
    Login {
        /// Where to go after logging in.
        return_to: Option<String>,
    },

    /// Service unavailable page.
    ServiceUnavailable {
        /// Where to retry once the service is back.
        return_to: String,
    },

    /// Not found page.
    NotFound,
}

impl Redirect {
    /// Route path of the target page.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login { .. } => "/login",
            Self::ServiceUnavailable { .. } => "/500",
            Self::NotFound => "/404",
        }
    }

    /// Where to go afterwards, if anywhere.
    pub fn return_to(&self) -> Option<&str> {
        match self {
            Self::Login { return_to } => return_to.as_deref(),
            Self::ServiceUnavailable { return_to } => Some(return_to),
            Self::NotFound => None,
        }
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self.return_to() {
            Some(return_to) => write!(formatter, "{} (from {})", self.path(), return_to),
            None => fmt::Display::fmt(self.path(), formatter),
        }
    }
}

//
// RecordingNavigator
//

/// [Navigator] that keeps the current location and a history of redirects.
///
/// Suitable for headless hosts: navigating just moves the current location to the redirect's
/// path.
#[derive(Debug)]
pub struct RecordingNavigator {
    state: Mutex<RecordingNavigatorState>,
}

#[derive(Debug)]
struct RecordingNavigatorState {
    location: String,
    redirects: Vec<Redirect>,
}

impl RecordingNavigator {
    /// Constructor.
    pub fn new<LocationT>(location: LocationT) -> Self
    where
        LocationT: Into<String>,
    {
        Self { state: Mutex::new(RecordingNavigatorState { location: location.into(), redirects: Default::default() }) }
    }

    /// Go somewhere (as the user).
    pub fn go<LocationT>(&self, location: LocationT)
    where
        LocationT: Into<String>,
    {
        self.state.lock().location = location.into();
    }

    /// All redirects so far, oldest first.
    pub fn redirects(&self) -> Vec<Redirect> {
        self.state.lock().redirects.clone()
    }

    /// Most recent redirect.
    pub fn last_redirect(&self) -> Option<Redirect> {
        self.state.lock().redirects.last().cloned()
    }
}

impl Default for RecordingNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for RecordingNavigator {
    fn current_location(&self) -> String {
        self.state.lock().location.clone()
    }

    fn navigate(&self, redirect: Redirect) {
        tracing::info!("redirect: {}", redirect);
        let mut state = self.state.lock();
        state.location = redirect.path().into();
        state.redirects.push(redirect);
    }
}
