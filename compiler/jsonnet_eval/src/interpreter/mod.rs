//! The lazy tree-walking interpreter.
//!
//! All evaluation goes through [`Interpreter::eval`], which dispatches on
//! the core node kind. Helper modules split out the larger pieces:
//!
//! - `call`: thunk forcing and function application
//! - `objects`: object construction, field access, `super`, asserts
//! - `operators`: binary and unary operators, equality, ordering
//! - `imports`: compilation, imports, external variables
//!
//! # Renders
//!
//! Values only live for the duration of one render. Everything a render
//! allocates on the heap is rolled back when it finishes, as are the
//! import value and external variable caches. Compiled programs (the core
//! arena, resolutions and source map) are kept for the VM's lifetime.

mod call;
mod eval;
mod imports;
mod objects;
mod operators;

pub(crate) use call::{bind_args, CallArg};
pub(crate) use operators::check_number;

use crate::error::{EvalError, EvalResult};
use crate::heap::{EnvId, Heap, ObjectId, Watermark};
use crate::importer::{ExtVar, Importer};
use crate::object::{FieldBody, Leaf, LeafField, ObjectValue};
use crate::stdlib;
use crate::thunk::Thunk;
use crate::value::{Ctx, NativeFn, Value};
use jsonnet_analysis::Resolutions;
use jsonnet_diagnostic::SourceMap;
use jsonnet_ir::{CoreArena, CoreId, Name, StringInterner, Visibility};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Names bound in the outermost frame of every program, in slot order.
pub(crate) const GLOBALS: [Name; 2] = [Name::STD, Name::DOLLAR_STD];

pub struct Interpreter {
    pub(crate) interner: StringInterner,
    pub(crate) arena: CoreArena,
    pub(crate) resolutions: Resolutions,
    pub(crate) sources: SourceMap,
    pub(crate) heap: Heap,

    max_stack: usize,
    depth: usize,

    importer: Box<dyn Importer>,
    ext_vars: FxHashMap<Rc<str>, ExtVar>,
    natives: FxHashMap<Rc<str>, Rc<NativeFn>>,

    /// Compiled programs keyed by file name and text.
    programs: FxHashMap<(Rc<str>, Rc<str>), CoreId>,
    /// Importer answers keyed by importing file and path.
    resolved: FxHashMap<(Rc<str>, Rc<str>), (Rc<str>, Rc<[u8]>)>,

    // Per render.
    import_values: FxHashMap<Rc<str>, Value>,
    import_stack: Vec<Rc<str>>,
    ext_values: FxHashMap<Rc<str>, Thunk>,

    std_obj: ObjectId,
    watermark: Watermark,
}

impl Interpreter {
    /// Create an interpreter and bootstrap the standard library.
    #[tracing::instrument(level = "debug", skip_all, fields(max_stack = max_stack))]
    pub fn new(max_stack: usize, importer: Box<dyn Importer>) -> EvalResult<Self> {
        let mut heap = Heap::default();
        let placeholder = heap.alloc_object(ObjectValue::new(Vec::new()));
        let watermark = heap.mark();
        let mut interp = Interpreter {
            interner: StringInterner::new(),
            arena: CoreArena::new(),
            resolutions: Resolutions::new(),
            sources: SourceMap::new(),
            heap,
            max_stack,
            depth: 0,
            importer,
            ext_vars: FxHashMap::default(),
            natives: FxHashMap::default(),
            programs: FxHashMap::default(),
            resolved: FxHashMap::default(),
            import_values: FxHashMap::default(),
            import_stack: Vec::new(),
            ext_values: FxHashMap::default(),
            std_obj: placeholder,
            watermark,
        };
        interp.std_obj = stdlib::bootstrap(&mut interp)?;
        interp.watermark = interp.heap.mark();
        tracing::debug!(nodes = interp.arena.len(), "standard library ready");
        Ok(interp)
    }

    pub fn set_max_stack(&mut self, max_stack: usize) {
        self.max_stack = max_stack;
    }

    pub fn set_importer(&mut self, importer: Box<dyn Importer>) {
        self.importer = importer;
        self.resolved.clear();
    }

    pub fn set_ext_var(&mut self, name: &str, value: ExtVar) {
        self.ext_vars.insert(Rc::from(name), value);
    }

    pub fn register_native(&mut self, native: NativeFn) {
        self.natives.insert(native.name.clone(), Rc::new(native));
    }

    /// Files loaded so far, for rendering error locations.
    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Evaluate `source`, apply top-level arguments if it is a function,
    /// and hand the result to `finish`. Heap state is discarded afterwards,
    /// so `finish` must turn the value into something self-contained.
    #[tracing::instrument(level = "debug", skip_all, fields(filename = filename))]
    pub fn render<R>(
        &mut self,
        filename: &str,
        source: &str,
        tlas: &[(String, ExtVar)],
        finish: impl FnOnce(&mut Self, Value) -> EvalResult<R>,
    ) -> EvalResult<R> {
        let result = self.render_inner(filename, source, tlas, finish);
        self.end_render();
        result
    }

    fn render_inner<R>(
        &mut self,
        filename: &str,
        source: &str,
        tlas: &[(String, ExtVar)],
        finish: impl FnOnce(&mut Self, Value) -> EvalResult<R>,
    ) -> EvalResult<R> {
        let name: Rc<str> = Rc::from(filename);
        let root = self.compile(&name, source)?;
        let env = self.program_frame(&name);
        let value = self.eval(root, env, Ctx::default())?;
        let value = self.apply_tlas(value, tlas)?;
        finish(self, value)
    }

    fn end_render(&mut self) {
        tracing::trace!(frames = self.heap.frame_count(), "render finished");
        self.heap.rollback(self.watermark);
        self.import_values.clear();
        self.import_stack.clear();
        self.ext_values.clear();
        self.depth = 0;
    }

    /// Outermost frame of a program: `std` extended with `thisFile`, and
    /// the raw library as `$std`.
    pub(crate) fn program_frame(&mut self, filename: &Rc<str>) -> EnvId {
        let mut leaf = Leaf::default();
        leaf.fields.insert(
            Rc::from("thisFile"),
            LeafField {
                visibility: Visibility::Hidden,
                plus_super: false,
                body: FieldBody::Value(Thunk::done(Value::Str(filename.clone()))),
            },
        );
        let std = self.heap.object(self.std_obj);
        let user_std = ObjectValue::extend(std, &ObjectValue::new(vec![Rc::new(leaf)]));
        let user_std = self.heap.alloc_object(user_std);
        self.heap.alloc_frame(
            None,
            [
                Thunk::done(Value::Object(user_std)),
                Thunk::done(Value::Object(self.std_obj)),
            ],
        )
    }

    /// Count one language-level frame against the stack limit.
    pub(crate) fn enter(&mut self) -> EvalResult<()> {
        if self.depth >= self.max_stack {
            tracing::debug!(depth = self.depth, "stack limit reached");
            return Err(EvalError::new(crate::error::EvalErrorKind::StackOverflow));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn native(&self, name: &str) -> Option<Rc<NativeFn>> {
        self.natives.get(name).cloned()
    }
}
