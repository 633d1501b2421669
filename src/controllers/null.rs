use super::{Command, ControllerError, ControllerHandle};

/// Stand-in exposed while no real controller is attached. Every command
/// succeeds without effect, every query yields a zero value and no command
/// is reported as supported. Exists purely so call sites never branch on an
/// absent controller.
#[derive(Default)]
pub(crate) struct NullController;

impl ControllerHandle for NullController {
    fn load_video(&mut self, _id: &str) -> Result<(), ControllerError> {
        Ok(())
    }

    fn play(&mut self) -> Result<(), ControllerError> {
        Ok(())
    }

    fn pause(&mut self) -> Result<(), ControllerError> {
        Ok(())
    }

    fn set_current_time(&mut self, _seconds: f64) -> Result<(), ControllerError> {
        Ok(())
    }

    fn set_volume(&mut self, _volume: f64) -> Result<(), ControllerError> {
        Ok(())
    }

    fn set_muted(&mut self, _muted: bool) -> Result<(), ControllerError> {
        Ok(())
    }

    fn set_playback_rate(&mut self, _rate: f64) -> Result<(), ControllerError> {
        Ok(())
    }

    fn duration(&self) -> Result<Option<f64>, ControllerError> {
        Ok(Some(0.))
    }

    fn current_time(&self) -> Result<Option<f64>, ControllerError> {
        Ok(Some(0.))
    }

    fn volume(&self) -> Result<Option<f64>, ControllerError> {
        Ok(Some(0.))
    }

    fn muted(&self) -> Result<Option<bool>, ControllerError> {
        Ok(Some(false))
    }

    fn playback_rate(&self) -> Result<Option<f64>, ControllerError> {
        Ok(Some(0.))
    }

    fn supports(&self, _command: Command) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_fails_and_reports_zero_values() {
        let mut null = NullController;
        null.play().unwrap();
        null.set_playback_rate(2.).unwrap();
        assert_eq!(null.duration().unwrap(), Some(0.));
        assert_eq!(null.muted().unwrap(), Some(false));
        assert!(!null.supports(Command::Play));
    }
}
