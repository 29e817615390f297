pub mod aerodynamics;
pub mod kinematics;
pub mod stability;
