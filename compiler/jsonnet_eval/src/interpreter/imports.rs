//! Compilation, imports, external variables and top-level arguments.

use super::{CallArg, Interpreter, GLOBALS};
use crate::error::{CompileError, CompileStage, EvalError, EvalErrorKind, EvalResult};
use crate::importer::ExtVar;
use crate::thunk::Thunk;
use crate::value::{Ctx, Value};
use jsonnet_ir::{CoreId, Loc};
use std::rc::Rc;

impl Interpreter {
    /// Lex, parse, desugar and analyse a program, reusing the result if the
    /// same file name and text were compiled before.
    #[tracing::instrument(level = "debug", skip(self, text))]
    pub(crate) fn compile(&mut self, name: &Rc<str>, text: &str) -> EvalResult<CoreId> {
        let key = (name.clone(), Rc::from(text));
        if let Some(root) = self.programs.get(&key) {
            tracing::trace!("program cache hit");
            return Ok(*root);
        }
        let file = self.sources.add(name, text);
        let tokens = jsonnet_lexer::lex(text, &self.interner).map_err(|e| CompileError {
            stage: CompileStage::Lexical,
            code: e.code(),
            message: e.to_string(),
            loc: Loc::new(file, e.span),
        })?;
        let ast = jsonnet_parse::parse(&tokens, file, &self.interner).map_err(|e| CompileError {
            stage: CompileStage::Syntax,
            code: e.code(),
            message: e.to_string(),
            loc: e.loc,
        })?;
        let root = jsonnet_desugar::desugar(ast, &mut self.arena, &self.interner);
        jsonnet_analysis::analyze(
            root,
            &self.arena,
            &self.interner,
            &GLOBALS,
            &mut self.resolutions,
        )
        .map_err(|e| CompileError {
            stage: CompileStage::Static,
            code: e.code(),
            message: e.to_string(),
            loc: e.loc,
        })?;
        self.programs.insert(key, root);
        Ok(root)
    }

    /// Ask the importer for `path` as seen from the file containing `loc`.
    /// Answers are remembered for the lifetime of the interpreter.
    pub(super) fn resolve_import(&mut self, path: &str, loc: Loc) -> EvalResult<(Rc<str>, Rc<[u8]>)> {
        let from = self
            .sources
            .name(loc.file)
            .cloned()
            .unwrap_or_else(|| Rc::from(""));
        let key = (from.clone(), Rc::from(path));
        if let Some(hit) = self.resolved.get(&key) {
            tracing::trace!(path, "import cache hit");
            return Ok(hit.clone());
        }
        tracing::debug!(path, from = &*from, "resolving import");
        let file = self.importer.import(&from, path).map_err(|message| {
            EvalError::new(EvalErrorKind::Import {
                path: path.to_string(),
                message,
            })
        })?;
        let entry: (Rc<str>, Rc<[u8]>) = (Rc::from(file.canonical), Rc::from(file.content));
        self.resolved.insert(key, entry.clone());
        Ok(entry)
    }

    /// `import "path"`: the value of the imported program, evaluated once
    /// per render.
    pub(super) fn eval_import(&mut self, path: &str, loc: Loc) -> EvalResult<Value> {
        let (canonical, content) = self.resolve_import(path, loc)?;
        if let Some(value) = self.import_values.get(&canonical) {
            return Ok(value.clone());
        }
        if let Some(start) = self.import_stack.iter().position(|f| *f == canonical) {
            let mut cycle: Vec<&str> = self.import_stack[start..].iter().map(|f| &**f).collect();
            cycle.push(&canonical);
            return Err(EvalError::new(EvalErrorKind::ImportCycle(cycle.join(" -> "))));
        }
        let text = std::str::from_utf8(&content).map_err(|_| {
            EvalError::new(EvalErrorKind::Import {
                path: path.to_string(),
                message: "file is not valid UTF-8".to_string(),
            })
        })?;

        self.import_stack.push(canonical.clone());
        let result = self.compile(&canonical, text).and_then(|root| {
            let env = self.program_frame(&canonical);
            self.eval(root, env, Ctx::default())
        });
        self.import_stack.pop();

        let value = result.map_err(|e| e.with_frame(Some(loc), format!("import \"{path}\"")))?;
        self.import_values.insert(canonical, value.clone());
        Ok(value)
    }

    /// Thunk for an external variable or top-level argument. Code is
    /// compiled as its own program named `label`.
    fn ext_thunk(&mut self, label: &str, var: &ExtVar) -> EvalResult<Thunk> {
        match var {
            ExtVar::Str(s) => Ok(Thunk::done(Value::string(s.as_str()))),
            ExtVar::Json(json) => Ok(Thunk::done(self.from_json(json))),
            ExtVar::Code(code) => {
                let label: Rc<str> = Rc::from(label);
                let root = self.compile(&label, code)?;
                let env = self.program_frame(&label);
                Ok(Thunk::expr(root, env, Ctx::default()))
            }
        }
    }

    /// `std.extVar(name)`.
    pub(crate) fn ext_var(&mut self, name: &str) -> EvalResult<Value> {
        if let Some(thunk) = self.ext_values.get(name).cloned() {
            return self.force(&thunk);
        }
        let var = self
            .ext_vars
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::new(EvalErrorKind::UndefinedExtVar(name.to_string())))?;
        let thunk = self.ext_thunk(&format!("<extvar:{name}>"), &var)?;
        self.ext_values.insert(Rc::from(name), thunk.clone());
        self.force(&thunk)
    }

    /// Call a top-level function with the top-level arguments by name.
    pub(super) fn apply_tlas(&mut self, value: Value, tlas: &[(String, ExtVar)]) -> EvalResult<Value> {
        let Value::Function(func) = value else {
            return Ok(value);
        };
        let mut args = Vec::with_capacity(tlas.len());
        for (name, var) in tlas {
            let thunk = self.ext_thunk(&format!("<top-level-arg:{name}>"), var)?;
            args.push(CallArg::named(name.as_str(), thunk));
        }
        self.call(&func, args)
    }
}
