//! Update passes
//!
//! A frame is split into stages. Each attached component carries a [`Pass`]
//! mask and is updated in every stage the mask intersects.

use bitflags::bitflags;

bitflags! {
    /// Update stage mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Pass: u32 {
        /// Input handling
        const INPUT = 1 << 0;
        /// Camera placement, after input and before general logic
        const CAMERA = 1 << 1;
        /// General logic, before the late stage
        const DEFAULT = 1 << 2;
        /// Late update; components run here unless they ask otherwise
        const UPDATE = 1 << 3;
    }
}

impl Pass {
    /// Stages in execution order, one traversal each per frame
    pub const ORDERED: [Pass; 4] = [Pass::INPUT, Pass::CAMERA, Pass::DEFAULT, Pass::UPDATE];
}

impl Default for Pass {
    fn default() -> Self {
        Self::UPDATE
    }
}
