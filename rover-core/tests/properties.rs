use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use proptest::prelude::*;
use rover_core::arm::{ArmActuator, Pose};
use rover_core::avoidance::{AvoidancePolicy, Tier};
use rover_core::config::ArmConfig;
use rover_core::traits::{Distance, JointServo, ServoError};
use rover_protocol::{Joint, StepDirection};

#[derive(Clone, Default)]
struct Writes(Rc<RefCell<Vec<(usize, u8)>>>);

struct Servo {
    joint: usize,
    writes: Writes,
}

impl JointServo for Servo {
    fn write_angle(&mut self, degrees: u8) -> Result<(), ServoError> {
        self.writes.0.borrow_mut().push((self.joint, degrees));
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn arm(writes: &Writes) -> ArmActuator<Servo, NoDelay> {
    let servos = [0, 1, 2, 3].map(|joint| Servo {
        joint,
        writes: writes.clone(),
    });
    ArmActuator::new(servos, NoDelay, ArmConfig::default())
}

fn steppable_joint() -> impl Strategy<Value = Joint> {
    prop_oneof![
        Just(Joint::Base),
        Just(Joint::Shoulder),
        Just(Joint::Elbow)
    ]
}

proptest! {
    #[test]
    fn steps_up_saturate_at_ceiling(joint in steppable_joint(), start in -50i32..250, steps in 0usize..20) {
        let writes = Writes::default();
        let mut arm = arm(&writes);
        arm.move_to_angle(joint, start);

        for _ in 0..steps {
            let before = arm.angle(joint).degrees();
            arm.move_joint(joint, StepDirection::Up);
            let after = arm.angle(joint).degrees();
            prop_assert_eq!(after, before.saturating_add(15).min(180));
        }
    }

    #[test]
    fn steps_down_saturate_at_floor(joint in steppable_joint(), start in -50i32..250, steps in 0usize..20) {
        let writes = Writes::default();
        let mut arm = arm(&writes);
        arm.move_to_angle(joint, start);

        for _ in 0..steps {
            let before = arm.angle(joint).degrees();
            arm.move_joint(joint, StepDirection::Down);
            prop_assert_eq!(arm.angle(joint).degrees(), before.saturating_sub(15));
        }
    }

    #[test]
    fn no_write_without_change(joint in steppable_joint(), up in any::<bool>(), extra in 1usize..5) {
        let writes = Writes::default();
        let mut arm = arm(&writes);
        let (limit, direction) = if up {
            (500, StepDirection::Up)
        } else {
            (-500, StepDirection::Down)
        };
        arm.move_to_angle(joint, limit);
        writes.0.borrow_mut().clear();

        for _ in 0..extra {
            arm.move_joint(joint, direction);
        }
        prop_assert!(writes.0.borrow().is_empty());
    }

    #[test]
    fn absolute_move_writes_only_the_clamped_target(joint in steppable_joint(), target in any::<i32>()) {
        let writes = Writes::default();
        let mut arm = arm(&writes);
        arm.move_to_angle(joint, target);

        let expected = target.clamp(0, 180) as u8;
        let written = writes.0.borrow();
        prop_assert_eq!(written.as_slice(), &[(joint.index(), expected)]);
    }

    #[test]
    fn decoded_pose_is_in_range(bytes in any::<[u8; 16]>()) {
        let pose = Pose::from_bytes(&bytes);
        prop_assert!(pose.angles().iter().all(|a| a.degrees() <= 180));
    }

    #[test]
    fn tiers_ordered_by_distance(a in any::<u16>(), b in any::<u16>()) {
        let policy = AvoidancePolicy::new(
            Distance::from_cm(15),
            Distance::from_cm(30),
            Distance::from_cm(50),
        ).unwrap();
        let rank = |t: Tier| match t {
            Tier::Emergency => 0,
            Tier::Stop => 1,
            Tier::Avoid => 2,
            Tier::Clear => 3,
            Tier::Blind => unreachable!(),
        };
        let (near, far) = (a.min(b), a.max(b));
        prop_assert!(
            rank(policy.classify(Distance::from_mm(near)))
                <= rank(policy.classify(Distance::from_mm(far)))
        );
    }
}
