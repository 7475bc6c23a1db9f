//! Kinematic integration for answer targets.
//!
//! Moves every active, unfrozen target: position += velocity * dt.

use std::time::Duration;

use hecs::World;

use mathpop_core::components::{AnswerTarget, Kinematics, TargetPresentation};
use mathpop_core::enums::TargetState;
use mathpop_core::types::TargetId;

/// Integrate positions of active, unfrozen targets.
pub fn run(world: &mut World, dt: Duration) {
    let dt = dt.as_secs_f32();
    for (_entity, (target, kinematics, presentation)) in
        world.query_mut::<(&AnswerTarget, &mut Kinematics, &TargetPresentation)>()
    {
        if target.state != TargetState::Active || presentation.frozen {
            continue;
        }
        kinematics.position += kinematics.velocity * dt;
    }
}

/// Collect ids of active targets at or above `top`, in id order.
pub fn collect_escaped(world: &mut World, top: f32, out: &mut Vec<TargetId>) {
    out.clear();
    for (_entity, (target, kinematics)) in world.query_mut::<(&AnswerTarget, &Kinematics)>() {
        if target.state == TargetState::Active && kinematics.position.y >= top {
            out.push(target.id);
        }
    }
    out.sort();
}
