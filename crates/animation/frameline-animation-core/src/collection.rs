//! Animators attached to one node.

use crate::animator::{Animator, DynAnimator};
use crate::error::AnimationError;
use crate::interp::Animatable;

/// At most one animator per `(target_property, animation_id)` pair.
#[derive(Debug, Default)]
pub struct AnimatorCollection {
    animators: Vec<Box<dyn DynAnimator>>,
}

impl AnimatorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, path: &str, animation_id: Option<&str>) -> Option<usize> {
        self.animators
            .iter()
            .position(|a| a.target_property() == path && a.animation_id() == animation_id)
    }

    /// Add an animator, returning the one it replaced, if any.
    pub fn add(&mut self, animator: Box<dyn DynAnimator>) -> Option<Box<dyn DynAnimator>> {
        match self.position(animator.target_property(), animator.animation_id()) {
            Some(i) => Some(std::mem::replace(&mut self.animators[i], animator)),
            None => {
                self.animators.push(animator);
                None
            }
        }
    }

    pub fn insert<T: Animatable>(&mut self, animator: Animator<T>) -> Option<Box<dyn DynAnimator>> {
        self.add(Box::new(animator))
    }

    pub fn find(&self, path: &str, animation_id: Option<&str>) -> Option<&dyn DynAnimator> {
        self.position(path, animation_id)
            .map(|i| &*self.animators[i])
    }

    pub fn find_mut(
        &mut self,
        path: &str,
        animation_id: Option<&str>,
    ) -> Option<&mut (dyn DynAnimator + 'static)> {
        let i = self.position(path, animation_id)?;
        Some(self.animators[i].as_mut())
    }

    /// Like [`find`](Self::find) but also requires the value type to match.
    pub fn find_typed<T: Animatable>(
        &self,
        path: &str,
        animation_id: Option<&str>,
    ) -> Option<&Animator<T>> {
        self.find(path, animation_id)?
            .as_any()
            .downcast_ref::<Animator<T>>()
    }

    pub fn find_typed_mut<T: Animatable>(
        &mut self,
        path: &str,
        animation_id: Option<&str>,
    ) -> Option<&mut Animator<T>> {
        self.find_mut(path, animation_id)?
            .as_any_mut()
            .downcast_mut::<Animator<T>>()
    }

    /// Existing animator for the pair, or a new empty one. Fails when the
    /// existing animator animates a different value type.
    pub fn find_or_add<T: Animatable>(
        &mut self,
        path: &str,
        animation_id: Option<&str>,
    ) -> Result<&mut Animator<T>, AnimationError> {
        let i = match self.position(path, animation_id) {
            Some(i) => i,
            None => {
                let mut animator = Animator::<T>::new(path);
                animator.set_animation_id(animation_id.map(str::to_string));
                self.animators.push(Box::new(animator));
                self.animators.len() - 1
            }
        };
        let existing = self.animators[i].value_kind();
        self.animators[i]
            .as_any_mut()
            .downcast_mut::<Animator<T>>()
            .ok_or_else(|| AnimationError::InvalidKeys {
                path: path.to_string(),
                reason: format!("existing animator is {existing:?}, requested {:?}", T::KIND),
            })
    }

    pub fn remove(&mut self, path: &str, animation_id: Option<&str>) -> Option<Box<dyn DynAnimator>> {
        let i = self.position(path, animation_id)?;
        Some(self.animators.remove(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn DynAnimator> + '_ {
        self.animators.iter().map(|a| &**a)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn DynAnimator>> + '_ {
        self.animators.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.animators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animators.is_empty()
    }

    /// Clone every animator: key lists are shared, bindings start fresh.
    pub fn shared_clone(&self) -> Self {
        Self {
            animators: self.animators.iter().map(|a| a.box_clone()).collect(),
        }
    }

    pub fn unbind_all(&mut self) {
        for a in &mut self.animators {
            a.unbind();
        }
    }
}

impl Clone for AnimatorCollection {
    fn clone(&self) -> Self {
        self.shared_clone()
    }
}
