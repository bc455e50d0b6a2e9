//! Animation playback.
//!
//! [`animation_update`] advances every [`Animator`] by the variable-rate delta
//! and publishes the frame on screen as the `Image` property, which is all
//! the presentation layer reads.

use bevy_ecs::prelude::*;

use crate::components::animator::Animator;
use crate::components::properties::{IMAGE, Properties};
use crate::error::BehaviourError;
use crate::resources::worldtime::WorldTime;

/// Advance animators and update the `Image` property.
///
/// Contract
/// - Reads [`WorldTime`] for the scaled delta.
/// - Entities without [`Properties`] still advance; nothing is published.
pub fn animation_update(
    time: Option<Res<WorldTime>>,
    mut query: Query<(&mut Animator, Option<&mut Properties>)>,
) -> Result<(), BehaviourError> {
    let time = time.ok_or(BehaviourError::MissingResource("WorldTime"))?;
    for (mut animator, properties) in query.iter_mut() {
        animator.advance(time.delta);
        if let (Some(frame), Some(mut properties)) = (animator.current_frame(), properties)
            && properties.get_text(IMAGE) != Some(frame)
        {
            properties.set_text(IMAGE, frame);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::components::animator::{AnimationClip, ClipTable};

    fn clips() -> Arc<ClipTable> {
        let mut t = ClipTable::default();
        t.insert(
            "walk".into(),
            AnimationClip {
                repeat: true,
                duration: 0.1,
                frames: vec!["walk_0".into(), "walk_1".into()],
            },
        );
        Arc::new(t)
    }

    fn run(world: &mut World) {
        let id = world.register_system(animation_update);
        world.run_system(id).unwrap().unwrap();
    }

    #[test]
    fn test_image_follows_frame() {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            delta: 0.15,
            ..Default::default()
        });
        let e = world
            .spawn((Animator::with_initial(clips(), "walk"), Properties::default()))
            .id();
        run(&mut world);
        let props = world.get::<Properties>(e).unwrap();
        assert_eq!(props.get_text(IMAGE), Some("walk_1"));
    }

    #[test]
    fn test_missing_time_is_an_error() {
        let mut world = World::new();
        world.spawn(Animator::with_initial(clips(), "walk"));
        let id = world.register_system(animation_update);
        let result = world.run_system(id).unwrap();
        assert!(matches!(
            result,
            Err(BehaviourError::MissingResource("WorldTime"))
        ));
    }
}
