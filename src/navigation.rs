//! Navigation collaborator.
//!
//! The monitor never owns routing state; it only asks a `Navigator` to push
//! a screen or to go back one entry.

use tracing::debug;
use tracing::info;

/// Screens the monitor can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Full-screen mask hiding content while the app is inactive.
    Overlay,
    /// Re-authentication screen.
    Lock,
}

impl Screen {
    /// Route identifier used by the host router.
    pub fn route(self) -> &'static str {
        match self {
            Self::Overlay => "/(modal)/overlay",
            Self::Lock => "/(modal)/lock",
        }
    }
}

/// Capability set the monitor needs from a router.
pub trait Navigator {
    /// Present a screen on top of the current one.
    fn push(&mut self, screen: Screen);

    /// Whether there is an entry above the root to pop.
    fn can_go_back(&self) -> bool;

    /// Pop the topmost entry.
    fn back(&mut self);
}

/// In-process navigation stack above an implicit root screen.
#[derive(Debug, Default)]
pub struct StackNavigator {
    stack: Vec<Screen>,
    history: Vec<Screen>,
}

impl StackNavigator {
    /// Create a navigator showing only the root screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Topmost pushed screen, or `None` when the root is showing.
    pub fn current(&self) -> Option<Screen> {
        self.stack.last().copied()
    }

    /// Number of entries above the root.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Every screen ever pushed, in order.
    pub fn history(&self) -> &[Screen] {
        &self.history
    }
}

impl Navigator for StackNavigator {
    fn push(&mut self, screen: Screen) {
        info!("Presenting {}", screen.route());
        self.stack.push(screen);
        self.history.push(screen);
    }

    fn can_go_back(&self) -> bool {
        !self.stack.is_empty()
    }

    fn back(&mut self) {
        match self.stack.pop() {
            Some(screen) => info!("Dismissed {}", screen.route()),
            None => debug!("Nothing to go back from"),
        }
    }
}
