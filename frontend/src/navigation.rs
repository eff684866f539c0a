use log::info;
use std::cell::RefCell;
use std::rc::Rc;

/// Hard navigation out of the current page.
pub trait Navigator {
    fn redirect(&self, route: &str);
}

/// Records redirects instead of performing them. Native clients poll
/// [`MemoryNavigator::take_redirect`] to react to a forced logout.
#[derive(Clone, Debug, Default)]
pub struct MemoryNavigator {
    redirects: Rc<RefCell<Vec<String>>>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.borrow().clone()
    }

    pub fn take_redirect(&self) -> Option<String> {
        self.redirects.borrow_mut().pop()
    }
}

impl Navigator for MemoryNavigator {
    fn redirect(&self, route: &str) {
        info!("Redirecting to {}", route);
        self.redirects.borrow_mut().push(route.to_string());
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserNavigator;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::Navigator;
    use log::{error, info};

    /// Sets `window.location`, dropping all in-page state.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct BrowserNavigator;

    impl Navigator for BrowserNavigator {
        fn redirect(&self, route: &str) {
            info!("Redirecting to {}", route);
            let Some(window) = web_sys::window() else {
                error!("No window available for redirect to {}", route);
                return;
            };
            if let Err(e) = window.location().set_href(route) {
                error!("Failed to redirect to {}: {:?}", route, e);
            }
        }
    }
}
