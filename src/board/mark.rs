use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Player marks
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// X, always moves first
    #[serde(rename = "x")]
    Cross,
    /// O, the computer in vs-computer mode
    #[serde(rename = "o")]
    Nought,
}

impl Mark {
    /// List all mark variants
    pub const fn variants() -> [Mark; 2] {
        [Mark::Cross, Mark::Nought]
    }

    pub const fn opponent(&self) -> Self {
        match self {
            Mark::Cross => Mark::Nought,
            Mark::Nought => Mark::Cross,
        }
    }

    pub const fn symbol(&self) -> char {
        match self {
            Mark::Cross => 'X',
            Mark::Nought => 'O',
        }
    }
}

impl Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{symbol}", symbol = self.symbol())
    }
}
