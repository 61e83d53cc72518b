//! Global constants for rf-core

/// Minimum selection accuracy for a candidate to count as under the cursor
pub const HIT_THRESHOLD: f32 = 0.99;

/// Default radius of bone and joint discs (world units)
pub const DISC_RADIUS: f32 = 0.02;

/// Default radius of the joint limit arcs (world units)
pub const JOINT_HANDLE_RADIUS: f32 = 0.1;

/// Upper bound for every angular joint limit (degrees)
pub const MAX_ANGULAR_LIMIT: f32 = 180.0;

/// Scale applied to a box collider's largest cross-section for its hit region
pub const BOX_HANDLE_SCALE: f32 = 0.7;

/// Fixed hit-region size of a joint handle
pub const JOINT_HANDLE_SIZE: f32 = 0.05;

/// Color for unselected affordances (white, RGBA)
pub const NORMAL_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.25];

/// Color for selected or highlighted affordances (yellow, RGBA)
pub const SELECTED_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 0.25];

/// Color of a joint that has a connected body
pub const CONNECTED_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 1.0];

/// Color of warnings drawn in the viewport (joint without connection, pending bone)
pub const ALERT_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Axis colors for joint limit arcs (X, Y, Z)
pub const AXIS_COLORS: [[f32; 4]; 3] = [
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
];
