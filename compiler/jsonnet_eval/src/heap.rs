//! Arena for environments and objects.
//!
//! Frames and objects refer to each other by id, so closures capturing
//! their own frame and objects whose fields mention `self` never form
//! reference-counting cycles. Everything allocated during a render is
//! dropped by rolling back to the watermark taken after bootstrap.

use crate::object::ObjectValue;
use crate::thunk::Thunk;
use smallvec::SmallVec;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnvId(u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Variables bound by one `local`, call, comprehension element or program.
struct Frame {
    parent: Option<EnvId>,
    slots: SmallVec<[Thunk; 4]>,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Watermark {
    frames: usize,
    objects: usize,
}

#[derive(Default)]
pub(crate) struct Heap {
    frames: Vec<Frame>,
    objects: Vec<ObjectValue>,
}

impl Heap {
    /// A frame whose slots are filled in by [`Heap::fill_frame`], so that
    /// thunks created for them can capture the frame itself.
    pub(crate) fn reserve_frame(&mut self, parent: Option<EnvId>) -> EnvId {
        let id = EnvId(self.frames.len() as u32);
        self.frames.push(Frame {
            parent,
            slots: SmallVec::new(),
        });
        id
    }

    pub(crate) fn fill_frame(&mut self, env: EnvId, slots: impl IntoIterator<Item = Thunk>) {
        if let Some(frame) = self.frames.get_mut(env.0 as usize) {
            frame.slots.extend(slots);
        }
    }

    pub(crate) fn alloc_frame(
        &mut self,
        parent: Option<EnvId>,
        slots: impl IntoIterator<Item = Thunk>,
    ) -> EnvId {
        let env = self.reserve_frame(parent);
        self.fill_frame(env, slots);
        env
    }

    /// Slot `slot` of the frame `up` levels above `env`.
    pub(crate) fn lookup(&self, env: EnvId, up: u32, slot: u32) -> Option<Thunk> {
        let mut frame = self.frames.get(env.0 as usize)?;
        for _ in 0..up {
            frame = self.frames.get(frame.parent?.0 as usize)?;
        }
        frame.slots.get(slot as usize).cloned()
    }

    pub(crate) fn alloc_object(&mut self, object: ObjectValue) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    pub(crate) fn object(&self, id: ObjectId) -> &ObjectValue {
        &self.objects[id.index()]
    }

    pub(crate) fn object_mut(&mut self, id: ObjectId) -> &mut ObjectValue {
        &mut self.objects[id.index()]
    }

    pub(crate) fn mark(&self) -> Watermark {
        Watermark {
            frames: self.frames.len(),
            objects: self.objects.len(),
        }
    }

    /// Drop everything allocated after `mark` and forget per-render state
    /// cached on the objects that survive.
    pub(crate) fn rollback(&mut self, mark: Watermark) {
        self.frames.truncate(mark.frames);
        self.objects.truncate(mark.objects);
        for object in &mut self.objects {
            object.reset();
        }
    }

    pub(crate) fn frame_count(&self) -> usize {
        self.frames.len()
    }
}
