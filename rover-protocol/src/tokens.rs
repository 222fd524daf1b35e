//! Token types making up the command vocabulary

/// Arm joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Joint {
    Base,
    Shoulder,
    Elbow,
    Gripper,
}

impl Joint {
    /// All joints in actuation order (base to gripper)
    pub const ALL: [Joint; 4] = [Joint::Base, Joint::Shoulder, Joint::Elbow, Joint::Gripper];

    /// Position of this joint in [`Joint::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Joint::Base => 0,
            Joint::Shoulder => 1,
            Joint::Elbow => 2,
            Joint::Gripper => 3,
        }
    }

    /// Token letter (`b`, `s`, `e`, `g`)
    pub const fn letter(self) -> char {
        match self {
            Joint::Base => 'b',
            Joint::Shoulder => 's',
            Joint::Elbow => 'e',
            Joint::Gripper => 'g',
        }
    }

    /// Joint for a token letter
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'b' => Some(Joint::Base),
            's' => Some(Joint::Shoulder),
            'e' => Some(Joint::Elbow),
            'g' => Some(Joint::Gripper),
            _ => None,
        }
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            Joint::Base => "Base",
            Joint::Shoulder => "Shoulder",
            Joint::Elbow => "Elbow",
            Joint::Gripper => "Gripper",
        }
    }
}

/// Direction of a single joint step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepDirection {
    /// Increase the angle (`+`)
    Up,
    /// Decrease the angle (`-`)
    Down,
}

impl StepDirection {
    pub const fn sign(self) -> char {
        match self {
            StepDirection::Up => '+',
            StepDirection::Down => '-',
        }
    }

    pub fn from_sign(c: char) -> Option<Self> {
        match c {
            '+' => Some(StepDirection::Up),
            '-' => Some(StepDirection::Down),
            _ => None,
        }
    }
}

/// Discrete gripper positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GripperAction {
    Open,
    Close,
}

impl GripperAction {
    pub const fn letter(self) -> char {
        match self {
            GripperAction::Open => 'o',
            GripperAction::Close => 'c',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'o' => Some(GripperAction::Open),
            'c' => Some(GripperAction::Close),
            _ => None,
        }
    }
}

/// Canned arm choreographies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Routine {
    Home,
    Scan,
    Pick,
    Drop,
    Wave,
    Bow,
    Reach,
}

impl Routine {
    pub const ALL: [Routine; 7] = [
        Routine::Home,
        Routine::Scan,
        Routine::Pick,
        Routine::Drop,
        Routine::Wave,
        Routine::Bow,
        Routine::Reach,
    ];

    /// Letter used after the `m` token
    pub const fn letter(self) -> char {
        match self {
            Routine::Home => 'h',
            Routine::Scan => 's',
            Routine::Pick => 'p',
            Routine::Drop => 'd',
            Routine::Wave => 'w',
            Routine::Bow => 'b',
            Routine::Reach => 'r',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        Routine::ALL
            .into_iter()
            .find(|r| r.letter() == c.to_ascii_lowercase())
    }

    pub const fn name(self) -> &'static str {
        match self {
            Routine::Home => "home",
            Routine::Scan => "scan",
            Routine::Pick => "pick",
            Routine::Drop => "drop",
            Routine::Wave => "wave",
            Routine::Bow => "bow",
            Routine::Reach => "reach",
        }
    }
}

/// Manual drive commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveCommand {
    Forward,
    Backward,
    /// Forward with the left side at half speed
    TurnLeft,
    /// Forward with the right side at half speed
    TurnRight,
    /// Spin in place counter-clockwise
    RotateLeft,
    /// Spin in place clockwise
    RotateRight,
    Stop,
}

impl DriveCommand {
    pub const ALL: [DriveCommand; 7] = [
        DriveCommand::Forward,
        DriveCommand::Backward,
        DriveCommand::TurnLeft,
        DriveCommand::TurnRight,
        DriveCommand::RotateLeft,
        DriveCommand::RotateRight,
        DriveCommand::Stop,
    ];

    /// Two-letter token
    pub const fn token(self) -> &'static str {
        match self {
            DriveCommand::Forward => "mv",
            DriveCommand::Backward => "bk",
            DriveCommand::TurnLeft => "lt",
            DriveCommand::TurnRight => "rt",
            DriveCommand::RotateLeft => "rl",
            DriveCommand::RotateRight => "rr",
            DriveCommand::Stop => "st",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        DriveCommand::ALL
            .into_iter()
            .find(|d| d.token().eq_ignore_ascii_case(token))
    }

    /// Whether this command moves the robot towards what is in front of it
    ///
    /// These are the commands the obstacle gate has a say in.
    pub const fn heads_forward(self) -> bool {
        matches!(
            self,
            DriveCommand::Forward | DriveCommand::TurnLeft | DriveCommand::TurnRight
        )
    }
}

/// Obstacle avoidance switch positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AvoidanceMode {
    /// Gate manual drive commands
    On,
    /// Avoidance inert
    Off,
    /// Drive autonomously
    Navigate,
}

impl AvoidanceMode {
    pub const fn token(self) -> &'static str {
        match self {
            AvoidanceMode::On => "on",
            AvoidanceMode::Off => "off",
            AvoidanceMode::Navigate => "nav",
        }
    }
}

/// Macro recording controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordingControl {
    Start,
    Stop,
    Play,
    Clear,
}

impl RecordingControl {
    pub const fn token(self) -> &'static str {
        match self {
            RecordingControl::Start => "stream",
            RecordingControl::Stop => "done",
            RecordingControl::Play => "play",
            RecordingControl::Clear => "clear",
        }
    }
}

/// Persisted settings actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsAction {
    Save,
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_order() {
        for (i, joint) in Joint::ALL.iter().enumerate() {
            assert_eq!(joint.index(), i);
            assert_eq!(Joint::from_letter(joint.letter()), Some(*joint));
        }
    }

    #[test]
    fn test_routine_letters_unique() {
        for a in Routine::ALL {
            for b in Routine::ALL {
                if a != b {
                    assert_ne!(a.letter(), b.letter());
                }
            }
        }
        assert_eq!(Routine::from_letter('W'), Some(Routine::Wave));
        assert_eq!(Routine::from_letter('x'), None);
    }

    #[test]
    fn test_drive_tokens() {
        assert_eq!(DriveCommand::from_token("MV"), Some(DriveCommand::Forward));
        assert_eq!(DriveCommand::from_token("st"), Some(DriveCommand::Stop));
        assert_eq!(DriveCommand::from_token("xx"), None);
        assert!(DriveCommand::TurnLeft.heads_forward());
        assert!(!DriveCommand::Backward.heads_forward());
        assert!(!DriveCommand::RotateRight.heads_forward());
    }
}
