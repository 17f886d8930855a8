use crate::identity::RotationTarget;
use crate::status::SurfaceStatus;
use std::fmt;

/// Which surfaces stopped being credited during the last iteration
///
/// Bit 0 marks desktop, bit 1 marks mobile. A surface is stalled when it is
/// not valid-and-completed and its progress did not move across the refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StallFlag(u8);

impl StallFlag {
    pub const NONE: StallFlag = StallFlag(0);
    pub const DESKTOP: StallFlag = StallFlag(1);
    pub const MOBILE: StallFlag = StallFlag(2);
    pub const BOTH: StallFlag = StallFlag(3);

    /// Computes the flag from progress captured before a refresh and the
    /// snapshots read after it
    pub fn evaluate(
        desktop_before: u32,
        mobile_before: u32,
        desktop: &SurfaceStatus,
        mobile: &SurfaceStatus,
    ) -> Self {
        let desktop_stalled = !desktop.valid_and_completed && desktop.progress == desktop_before;
        let mobile_stalled = !mobile.valid_and_completed && mobile.progress == mobile_before;
        StallFlag(desktop_stalled as u8 + 2 * mobile_stalled as u8)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_stalled(self) -> bool {
        self.0 > 0
    }

    pub fn desktop_stalled(self) -> bool {
        self.0 & 1 != 0
    }

    pub fn mobile_stalled(self) -> bool {
        self.0 & 2 != 0
    }

    /// Surfaces whose identity should be rotated
    pub fn rotation_target(self) -> Option<RotationTarget> {
        match (self.desktop_stalled(), self.mobile_stalled()) {
            (true, true) => Some(RotationTarget::Both),
            (true, false) => Some(RotationTarget::Desktop),
            (false, true) => Some(RotationTarget::Mobile),
            (false, false) => None,
        }
    }
}

impl fmt::Display for StallFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
