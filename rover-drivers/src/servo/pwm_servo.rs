//! Hobby servo on a PWM channel
//!
//! The angle is encoded as the high time of a fixed-period pulse train
//! (nominally 50 Hz). 0° and 180° map to the configured pulse limits and
//! everything in between is linear.

use embedded_hal::pwm::SetDutyCycle;
use rover_core::traits::{JointServo, ServoError};

/// Pulse timing for a servo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmServoConfig {
    /// Pulse width at 0° (µs)
    pub min_pulse_us: u32,
    /// Pulse width at 180° (µs)
    pub max_pulse_us: u32,
    /// PWM period (µs)
    pub period_us: u32,
}

impl Default for PwmServoConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: 544,
            max_pulse_us: 2400,
            period_us: 20_000,
        }
    }
}

/// Angle-commanded servo driven by one PWM output
pub struct PwmServo<P> {
    pwm: P,
    config: PwmServoConfig,
}

impl<P: SetDutyCycle> PwmServo<P> {
    pub fn new(pwm: P, config: PwmServoConfig) -> Self {
        Self { pwm, config }
    }

    /// Pulse width for an angle, saturating above 180°
    pub fn pulse_us(&self, degrees: u8) -> u32 {
        let degrees = degrees.min(180) as u32;
        let span = self.config.max_pulse_us - self.config.min_pulse_us;
        self.config.min_pulse_us + degrees * span / 180
    }

    fn duty_for(&self, pulse_us: u32) -> u16 {
        let max = self.pwm.max_duty_cycle() as u32;
        (pulse_us * max / self.config.period_us).min(max) as u16
    }
}

impl<P: SetDutyCycle> JointServo for PwmServo<P> {
    fn write_angle(&mut self, degrees: u8) -> Result<(), ServoError> {
        let duty = self.duty_for(self.pulse_us(degrees));
        self.pwm.set_duty_cycle(duty).map_err(|_| ServoError::Pwm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::pwm::ErrorType;

    struct MockPwm {
        max: u16,
        duty: u16,
    }

    impl ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }

    fn with_max(max: u16) -> PwmServo<MockPwm> {
        PwmServo::new(MockPwm { max, duty: 0 }, PwmServoConfig::default())
    }

    #[test]
    fn test_pulse_endpoints() {
        let servo = with_max(20_000);
        assert_eq!(servo.pulse_us(0), 544);
        assert_eq!(servo.pulse_us(90), 1472);
        assert_eq!(servo.pulse_us(180), 2400);
        assert_eq!(servo.pulse_us(255), 2400);
    }

    #[test]
    fn test_duty_scaling() {
        // One count per microsecond
        let mut servo = with_max(20_000);
        servo.write_angle(90).unwrap();
        assert_eq!(servo.pwm.duty, 1472);

        // RP2040 slice at 50 Hz with a 39061 top
        let mut servo = with_max(39_062);
        servo.write_angle(0).unwrap();
        assert_eq!(servo.pwm.duty, 1062);
        servo.write_angle(180).unwrap();
        assert_eq!(servo.pwm.duty, 4687);
    }
}
