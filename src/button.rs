//! Long/short press classification for the single control button.
//!
//! The button's edge interrupt arms the controller through
//! [`ButtonController::on_rising_edge`]. After that the poll loop calls
//! [`ButtonController::poll`] with the current input level and the time elapsed
//! since the previous poll. No busy-waiting happens in here; the caller decides
//! how often to poll while the button is held.

/// A classified button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressKind {
    /// Released before the long-press threshold.
    Short,
    /// Held until the long-press threshold.
    Long,
}

/// Where the button is within one physical press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonPressState {
    /// Released and waiting for a rising edge.
    #[default]
    Up,
    /// Pressed, hold time being measured.
    Down,
    /// Long press already reported, waiting for release.
    DownHandled,
}

/// Press detector for one button.
#[derive(Debug, Clone)]
pub struct ButtonController {
    state: ButtonPressState,
    held_ms: u32,
    long_press_ms: u32,
    min_press_ms: u32,
}

impl ButtonController {
    /// Creates a released button.
    ///
    /// # Arguments
    /// * `long_press_ms` - Hold time at which a press counts as long
    /// * `min_press_ms` - Presses released before this hold time are dropped as bounces
    pub fn new(long_press_ms: u32, min_press_ms: u32) -> Self {
        Self {
            state: ButtonPressState::Up,
            held_ms: 0,
            long_press_ms,
            min_press_ms,
        }
    }

    /// Arms the detector on a rising edge. Ignored unless the button is `Up`.
    pub fn on_rising_edge(&mut self) {
        if self.state == ButtonPressState::Up {
            self.state = ButtonPressState::Down;
            self.held_ms = 0;
        }
    }

    /// Advances the detector.
    ///
    /// # Arguments
    /// * `is_down` - Current level of the button input
    /// * `elapsed_ms` - Time since the previous poll
    ///
    /// # Returns
    /// The press that completed during this poll, if any. A long press is
    /// reported as soon as the threshold is reached and suppresses the short
    /// press its release would otherwise produce.
    pub fn poll(&mut self, is_down: bool, elapsed_ms: u32) -> Option<PressKind> {
        match self.state {
            ButtonPressState::Up => None,
            ButtonPressState::Down if is_down => {
                self.held_ms = self.held_ms.saturating_add(elapsed_ms);
                if self.held_ms >= self.long_press_ms {
                    self.state = ButtonPressState::DownHandled;
                    self.held_ms = 0;
                    Some(PressKind::Long)
                } else {
                    None
                }
            }
            ButtonPressState::Down => {
                let held_ms = core::mem::take(&mut self.held_ms);
                self.state = ButtonPressState::Up;
                (held_ms >= self.min_press_ms).then_some(PressKind::Short)
            }
            ButtonPressState::DownHandled => {
                if !is_down {
                    self.state = ButtonPressState::Up;
                }
                None
            }
        }
    }

    pub fn state(&self) -> ButtonPressState {
        self.state
    }

    /// Milliseconds the current press has been held.
    pub fn held_ms(&self) -> u32 {
        self.held_ms
    }

    /// Returns true while a press is being measured and the caller should keep polling.
    pub fn is_measuring(&self) -> bool {
        self.state == ButtonPressState::Down
    }
}
