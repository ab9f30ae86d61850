//! Sort-network stage kinds.

use serde::{Deserialize, Serialize};

/// Category of operation performed by one stage of the sort network.
///
/// A stage is "local" when its span fits inside the element range a single
/// workgroup addresses, and "global" when it has to coordinate across
/// workgroups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StageKind {
    /// No pending operation. Initial previous stage and terminal next stage.
    #[default]
    None,
    /// Reverse element order within a block, inside one workgroup.
    FlipLocal,
    /// Reverse element order within a block spanning several workgroups.
    FlipGlobal,
    /// Exchange block halves, inside one workgroup.
    DisperseLocal,
    /// Exchange block halves spanning several workgroups.
    DisperseGlobal,
}

impl StageKind {
    /// Classify a flip stage of the given span.
    pub fn flip(span: u32, workgroup_size: u32) -> Self {
        if span > workgroup_size * 2 {
            Self::FlipGlobal
        } else {
            Self::FlipLocal
        }
    }

    /// Classify a disperse stage of the given span.
    pub fn disperse(span: u32, workgroup_size: u32) -> Self {
        if span > workgroup_size * 2 {
            Self::DisperseGlobal
        } else {
            Self::DisperseLocal
        }
    }

    pub fn is_flip(&self) -> bool {
        matches!(self, Self::FlipLocal | Self::FlipGlobal)
    }

    pub fn is_disperse(&self) -> bool {
        matches!(self, Self::DisperseLocal | Self::DisperseGlobal)
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::FlipLocal | Self::DisperseLocal)
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Self::FlipGlobal | Self::DisperseGlobal)
    }

    /// Numeric code the compute shader switches on.
    pub fn code(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::FlipLocal => 1,
            Self::DisperseLocal => 2,
            Self::FlipGlobal => 3,
            Self::DisperseGlobal => 4,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "none" => Some(Self::None),
            "flip_local" | "fliplocal" => Some(Self::FlipLocal),
            "flip_global" | "flipglobal" => Some(Self::FlipGlobal),
            "disperse_local" | "disperselocal" => Some(Self::DisperseLocal),
            "disperse_global" | "disperseglobal" => Some(Self::DisperseGlobal),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::FlipLocal => "FLIP_LOCAL",
            Self::FlipGlobal => "FLIP_GLOBAL",
            Self::DisperseLocal => "DISPERSE_LOCAL",
            Self::DisperseGlobal => "DISPERSE_GLOBAL",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::None,
            Self::FlipLocal,
            Self::FlipGlobal,
            Self::DisperseLocal,
            Self::DisperseGlobal,
        ]
    }
}

/// One step of the sort network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Stage {
    pub kind: StageKind,
    /// Block height the stage exchanges elements over.
    pub span: u32,
}

impl Stage {
    pub fn new(kind: StageKind, span: u32) -> Self {
        Self { kind, span }
    }

    /// True for the terminal `(None, 0)` sentinel and other no-op stages.
    pub fn is_none(&self) -> bool {
        self.kind == StageKind::None || self.span == 0
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
