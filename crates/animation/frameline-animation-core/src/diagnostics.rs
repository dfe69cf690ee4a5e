use std::fmt;

use crate::binding::BindFailure;

/// Recoverable conditions the engine tolerates silently. A node forwards
/// them to an installed sink; without one they are dropped.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    BindingFailed {
        path: String,
        failure: BindFailure,
    },
    MarkerNotFound {
        animation: Option<String>,
        marker: String,
    },
    MalformedTrigger {
        token: String,
    },
    JumpLimitReached {
        animation: Option<String>,
        jumps: u32,
    },
}

type Sink = Box<dyn FnMut(&Diagnostic)>;

#[derive(Default)]
pub struct Diagnostics {
    sink: Option<Sink>,
}

impl Diagnostics {
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: impl FnMut(&Diagnostic) + 'static) -> Self {
        Self {
            sink: Some(Box::new(sink)),
        }
    }

    pub fn set_sink(&mut self, sink: impl FnMut(&Diagnostic) + 'static) {
        self.sink = Some(Box::new(sink));
    }

    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    #[inline]
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if let Some(sink) = self.sink.as_mut() {
            sink(&diagnostic);
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
