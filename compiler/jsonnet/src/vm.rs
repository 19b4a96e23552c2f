//! The embedding entry points.

use crate::config::VmConfig;
use crate::error::Error;
use jsonnet_diagnostic::SourceMap;
use jsonnet_eval::{
    EvalResult, ExtVar, Importer, Interpreter, NativeFn, NoImporter, Value,
};
use std::collections::BTreeMap;
use std::rc::Rc;

/// A Jsonnet virtual machine.
///
/// Holds the bootstrapped standard library, external variables, native
/// functions and the parse cache of imported files. Each `evaluate_*` call
/// is an independent render. A `Vm` is not `Send`; run independent VMs on
/// separate threads instead.
pub struct Vm {
    interp: Interpreter,
    config: VmConfig,
    tlas: Vec<(String, ExtVar)>,
}

/// Fluent constructor for [`Vm`].
pub struct VmBuilder {
    config: VmConfig,
    importer: Box<dyn Importer>,
    ext_vars: Vec<(String, ExtVar)>,
    tlas: Vec<(String, ExtVar)>,
    natives: Vec<NativeFn>,
}

impl Default for VmBuilder {
    fn default() -> Self {
        VmBuilder {
            config: VmConfig::default(),
            importer: Box::new(NoImporter),
            ext_vars: Vec::new(),
            tlas: Vec::new(),
            natives: Vec::new(),
        }
    }
}

impl VmBuilder {
    pub fn new() -> Self {
        VmBuilder::default()
    }

    #[must_use]
    pub fn config(mut self, config: VmConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn max_stack(mut self, max_stack: usize) -> Self {
        self.config.max_stack = max_stack;
        self
    }

    #[must_use]
    pub fn max_trace(mut self, max_trace: usize) -> Self {
        self.config.max_trace = max_trace;
        self
    }

    #[must_use]
    pub fn string_output(mut self, string_output: bool) -> Self {
        self.config.string_output = string_output;
        self
    }

    #[must_use]
    pub fn importer(mut self, importer: impl Importer + 'static) -> Self {
        self.importer = Box::new(importer);
        self
    }

    /// Bind `std.extVar(name)` to a string.
    #[must_use]
    pub fn ext_var(mut self, name: &str, value: &str) -> Self {
        self.ext_vars
            .push((name.to_string(), ExtVar::Str(value.to_string())));
        self
    }

    /// Bind `std.extVar(name)` to Jsonnet code, evaluated on first use.
    #[must_use]
    pub fn ext_code(mut self, name: &str, code: &str) -> Self {
        self.ext_vars
            .push((name.to_string(), ExtVar::Code(code.to_string())));
        self
    }

    #[must_use]
    pub fn ext_json(mut self, name: &str, value: serde_json::Value) -> Self {
        self.ext_vars.push((name.to_string(), ExtVar::Json(value)));
        self
    }

    /// Pass a string argument to a top-level function.
    #[must_use]
    pub fn tla_var(mut self, name: &str, value: &str) -> Self {
        self.tlas
            .push((name.to_string(), ExtVar::Str(value.to_string())));
        self
    }

    #[must_use]
    pub fn tla_code(mut self, name: &str, code: &str) -> Self {
        self.tlas
            .push((name.to_string(), ExtVar::Code(code.to_string())));
        self
    }

    /// Register a host function, reachable as `std.native(name)`.
    ///
    /// Arguments arrive as JSON values; the callback's `Err` becomes a
    /// host error carrying its message.
    #[must_use]
    pub fn native(
        mut self,
        name: &str,
        params: &[&str],
        callback: impl Fn(&[serde_json::Value]) -> Result<serde_json::Value, String> + 'static,
    ) -> Self {
        self.natives.push(NativeFn {
            name: Rc::from(name),
            params: params.iter().map(|p| Rc::from(*p)).collect(),
            callback: Box::new(callback),
        });
        self
    }

    /// Bootstrap the standard library and apply the settings.
    pub fn build(self) -> Result<Vm, Error> {
        let mut interp = Interpreter::new(self.config.max_stack, self.importer)
            .map_err(|err| Error::from_eval(&err, &SourceMap::new(), self.config.max_trace))?;
        for (name, value) in self.ext_vars {
            interp.set_ext_var(&name, value);
        }
        for native in self.natives {
            interp.register_native(native);
        }
        tracing::debug!(max_stack = self.config.max_stack, "vm ready");
        Ok(Vm {
            interp,
            config: self.config,
            tlas: self.tlas,
        })
    }
}

impl Vm {
    /// A VM with default settings and imports disabled.
    pub fn new() -> Result<Vm, Error> {
        VmBuilder::new().build()
    }

    pub fn builder() -> VmBuilder {
        VmBuilder::new()
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Replace the importer. Cached import resolutions are dropped.
    pub fn set_importer(&mut self, importer: impl Importer + 'static) {
        self.interp.set_importer(Box::new(importer));
    }

    pub fn set_max_stack(&mut self, max_stack: usize) {
        self.config.max_stack = max_stack;
        self.interp.set_max_stack(max_stack);
    }

    pub fn set_ext_var(&mut self, name: &str, value: ExtVar) {
        self.interp.set_ext_var(name, value);
    }

    /// Render `source` to JSON text ending in a newline, or to the raw
    /// string in string-output mode.
    #[tracing::instrument(level = "debug", skip_all, fields(filename = filename))]
    pub fn evaluate_snippet(&mut self, filename: &str, source: &str) -> Result<String, Error> {
        let string_output = self.config.string_output;
        let mut out = self.render(filename, source, |interp, value| {
            document(interp, value, string_output)
        })?;
        out.push('\n');
        Ok(out)
    }

    /// Render a top-level object to one document per visible field,
    /// keyed by field name.
    #[tracing::instrument(level = "debug", skip_all, fields(filename = filename))]
    pub fn evaluate_multi(
        &mut self,
        filename: &str,
        source: &str,
    ) -> Result<BTreeMap<String, String>, Error> {
        let string_output = self.config.string_output;
        let docs = self.render(filename, source, |interp, value| {
            interp.manifest_multi(value, string_output)
        })?;
        Ok(docs
            .into_iter()
            .map(|(name, mut text)| {
                text.push('\n');
                (name, text)
            })
            .collect())
    }

    /// Render a top-level array to one document per element.
    #[tracing::instrument(level = "debug", skip_all, fields(filename = filename))]
    pub fn evaluate_stream(&mut self, filename: &str, source: &str) -> Result<Vec<String>, Error> {
        let string_output = self.config.string_output;
        let docs = self.render(filename, source, |interp, value| {
            interp.manifest_stream(value, string_output)
        })?;
        Ok(docs
            .into_iter()
            .map(|mut text| {
                text.push('\n');
                text
            })
            .collect())
    }

    /// Render `source` to a host JSON value.
    #[tracing::instrument(level = "debug", skip_all, fields(filename = filename))]
    pub fn evaluate_value(
        &mut self,
        filename: &str,
        source: &str,
    ) -> Result<serde_json::Value, Error> {
        self.render(filename, source, Interpreter::to_json)
    }

    fn render<R>(
        &mut self,
        filename: &str,
        source: &str,
        finish: impl FnOnce(&mut Interpreter, Value) -> EvalResult<R>,
    ) -> Result<R, Error> {
        self.interp
            .render(filename, source, &self.tlas, finish)
            .map_err(|err| {
                tracing::debug!(code = %err.code(), "render failed");
                Error::from_eval(&err, self.interp.sources(), self.config.max_trace)
            })
    }
}

fn document(interp: &mut Interpreter, value: Value, string_output: bool) -> EvalResult<String> {
    if string_output {
        interp.manifest_string(value)
    } else {
        interp.manifest_json(value, true)
    }
}
