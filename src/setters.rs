//! Pre-bound property setters for the live mesh transform.
//!
//! The closures hold a `Weak` to the transform so a destroyed mesh turns
//! `apply` into a skipped frame instead of writing through a stale handle.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::{Mat4, Quat, Vec3};

use crate::mapper::MeshPose;

/// Live transform read by the renderer each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    /// Euler angles, radians, applied in XYZ order.
    pub rotation: Vec3,
    pub position: Vec3,
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        let rot = Quat::from_euler(
            glam::EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(rot, self.position)
    }
}

pub type SharedTransform = Rc<RefCell<Transform>>;

type Setter = Box<dyn Fn(f32)>;

struct Bound {
    target: Weak<RefCell<Transform>>,
    rotation_y: Setter,
    rotation_x: Setter,
    position_y: Setter,
    position_z: Setter,
}

fn setter(target: &SharedTransform, write: fn(&mut Transform, f32)) -> Setter {
    let weak = Rc::downgrade(target);
    Box::new(move |v| {
        if let Some(t) = weak.upgrade() {
            write(&mut t.borrow_mut(), v);
        }
    })
}

#[derive(Default)]
pub struct DirectSetters {
    bound: Option<Bound>,
}

impl DirectSetters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the four setters to `target`. A no-op when already bound to the
    /// same transform; rebinds when handed a different one.
    pub fn initialize(&mut self, target: &SharedTransform) {
        if let Some(bound) = &self.bound {
            if Weak::ptr_eq(&bound.target, &Rc::downgrade(target)) {
                return;
            }
        }
        self.bound = Some(Bound {
            target: Rc::downgrade(target),
            rotation_y: setter(target, |t, v| t.rotation.y = v),
            rotation_x: setter(target, |t, v| t.rotation.x = v),
            position_y: setter(target, |t, v| t.position.y = v),
            position_z: setter(target, |t, v| t.position.z = v),
        });
        log::debug!("direct setters bound");
    }

    pub fn is_initialized(&self) -> bool {
        self.bound.as_ref().is_some_and(|b| b.target.strong_count() > 0)
    }

    /// Writes `pose` straight into the bound transform. Returns `false` for a
    /// skipped frame: not yet initialized, or the target is gone.
    pub fn apply(&self, pose: MeshPose) -> bool {
        let Some(bound) = &self.bound else {
            return false;
        };
        if bound.target.strong_count() == 0 {
            return false;
        }
        (bound.rotation_y)(pose.rotation_y);
        (bound.rotation_x)(pose.rotation_x);
        (bound.position_y)(pose.position_y);
        (bound.position_z)(pose.position_z);
        true
    }

    /// Drops the closures so a later `initialize` starts clean.
    pub fn teardown(&mut self) {
        self.bound = None;
    }
}
