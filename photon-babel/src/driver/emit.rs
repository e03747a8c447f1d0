//! Statement emission: one backend hook per node, output pushed to the active buffer.

use std::collections::HashMap;

use photon_parser::photon::ast::{
    Arg, Assign, AugAssign, ClassStatement, DefStatement, Expr, ForIter, ForStatement,
    IfStatement, ImportStatement, Node, Param, Target,
};
use photon_parser::photon::token::Operator;
use tracing::debug;

use super::state::{BufferKind, ClassInfo, Emitter, Signature};
use crate::backend::{AssignTarget, DeleteTarget, FuncHeader, Hook, Lines, ParamHeader, RangeBounds};
use crate::error::TranspileError;
use crate::scope::{Binding, ScopeKind};
use crate::types::{Value, ValueType};

type EmitResult = Result<(), TranspileError>;

impl Emitter<'_> {
    pub(crate) fn emit(&mut self, node: &Node) -> EmitResult {
        let opcode = node.opcode();
        match node {
            Node::Comment(comment) => {
                let lines = self.backend.comment(&comment.text);
                let lines = self.check(lines, opcode)?;
                self.push_verbatim(lines);
                Ok(())
            }
            Node::Assign(assign) => self.assign(assign),
            Node::AugAssign(aug) => self.aug_assign(aug),
            Node::Declare(declare) => {
                let ty = ValueType::from(declare.ty);
                self.scopes
                    .declare(declare.name.clone(), Binding::new(ty.clone(), None));
                let lines = self.backend.var_init(&declare.name, &ty);
                self.emit_lines(lines, opcode)
            }
            Node::Expression(stmt) => self.expression(&stmt.expr),
            Node::If(stmt) => self.if_chain(stmt),
            Node::Elif(_) | Node::Else(_) => Err(TranspileError::internal(format!(
                "`{}` is not attached to an `if`",
                opcode
            ))),
            Node::While(stmt) => {
                let condition = self.eval(&stmt.expr)?;
                let lines = self.backend.while_open(&condition);
                self.emit_lines(lines, opcode)?;
                self.block(&stmt.block)?;
                let lines = self.backend.end_while();
                self.emit_lines(lines, opcode)
            }
            Node::For(stmt) => self.for_loop(stmt),
            Node::Def(def) => {
                let class = self.class_body.take();
                let previous = self.enter_out_of_main();
                let result = self.def(def, class.as_deref());
                self.buffer = previous;
                self.class_body = class;
                result
            }
            Node::Class(class) => {
                let previous = self.enter_out_of_main();
                let result = self.class(class);
                self.buffer = previous;
                result
            }
            Node::Return(ret) => {
                let value = match &ret.expr {
                    Some(expr) => Some(self.eval(expr)?),
                    None => None,
                };
                if let (Some(frame), Some(value)) = (self.frames.last_mut(), &value) {
                    if frame.is_none() && value.ty.is_known() {
                        *frame = Some(value.ty.clone());
                    }
                }
                let lines = self.backend.return_value(value.as_ref());
                self.emit_lines(lines, opcode)
            }
            Node::Break => {
                let lines = self.backend.break_loop();
                self.emit_lines(lines, opcode)
            }
            Node::Continue => {
                let lines = self.backend.continue_loop();
                self.emit_lines(lines, opcode)
            }
            Node::Import(import) => self.import(import),
            Node::Del(del) => {
                let target = match &del.target {
                    Target::Var { .. } => DeleteTarget::Name(self.eval(&del.target.to_expr())?),
                    Target::DotAccess { .. } => {
                        DeleteTarget::Attribute(self.eval(&del.target.to_expr())?)
                    }
                    Target::Index { base, index } => DeleteTarget::Element {
                        base: self.eval(base)?,
                        index: self.eval(index)?,
                    },
                };
                let lines = self.backend.delete(&target);
                self.emit_lines(lines, opcode)
            }
        }
    }

    fn emit_lines(&mut self, lines: Hook<Lines>, opcode: &str) -> EmitResult {
        let lines = self.check(lines, opcode)?;
        self.push(lines)
    }

    /// Top-level functions and classes are written outside the main body.
    fn enter_out_of_main(&mut self) -> BufferKind {
        let previous = self.buffer;
        if self.scopes.depth() == 0 {
            self.buffer = BufferKind::OutOfMain;
        }
        previous
    }

    fn block(&mut self, block: &Option<Vec<Node>>) -> EmitResult {
        self.nested(block.as_deref().unwrap_or_default(), ScopeKind::Block)
    }

    fn nested(&mut self, nodes: &[Node], kind: ScopeKind) -> EmitResult {
        self.scopes.push(kind);
        let result = nodes.iter().try_for_each(|node| self.emit(node));
        self.scopes.pop();
        result
    }

    fn assign(&mut self, assign: &Assign) -> EmitResult {
        let opcode = "assign";
        if let (Some(class), Target::Var { name, .. }) = (self.class_body.clone(), &assign.target)
        {
            let value = self.eval(&assign.expr)?;
            if let Some(info) = self.records.classes.get_mut(&class) {
                info.members
                    .entry(name.clone())
                    .or_insert_with(|| Binding::new(value.ty.clone(), value.element.clone()));
            }
            let lines = self.backend.class_attribute(name, &value);
            return self.emit_lines(lines, opcode);
        }

        match &assign.target {
            Target::Var { name, declared } => {
                let value = self.eval(&assign.expr)?;
                let declared = declared.map(ValueType::from);
                let (ty, element, declare) = match self.scopes.lookup(name).cloned() {
                    None => {
                        let ty = declared.unwrap_or_else(|| value.ty.clone());
                        self.scopes.declare(
                            name.clone(),
                            Binding::new(ty.clone(), value.element.clone()),
                        );
                        (ty, value.element.clone(), true)
                    }
                    Some(binding) => {
                        self.scopes.refine(
                            name,
                            Binding::new(value.ty.clone(), value.element.clone()),
                        );
                        let element = binding.element.or_else(|| value.element.clone());
                        (declared.unwrap_or(binding.ty), element, false)
                    }
                };
                let cast = value.ty.cast_to(&ty);
                let target = AssignTarget {
                    text: name.clone(),
                    ty,
                    element,
                    declare,
                };
                let lines = self.backend.assign(&target, &value, cast.as_ref());
                self.emit_lines(lines, opcode)
            }
            Target::DotAccess { path } => {
                let current = self.eval(&assign.target.to_expr())?;
                let value = self.eval(&assign.expr)?;
                self.record_member(path, &value);
                let cast = value.ty.cast_to(&current.ty);
                let target = AssignTarget {
                    text: current.text,
                    ty: current.ty,
                    element: current.element,
                    declare: false,
                };
                let lines = self.backend.assign(&target, &value, cast.as_ref());
                self.emit_lines(lines, opcode)
            }
            Target::Index { base, index } => {
                let base = self.eval(base)?;
                let index = self.eval(index)?;
                let value = self.eval(&assign.expr)?;
                let cast = match (&base.ty, &base.element) {
                    (ValueType::Array, Some(element)) => value.ty.cast_to(element),
                    _ => None,
                };
                let lines = self
                    .backend
                    .index_assign(&base, &index, &value, cast.as_ref());
                self.emit_lines(lines, opcode)
            }
        }
    }

    /// `self.x = v` inside a method makes `x` a member of the class.
    fn record_member(&mut self, path: &[String], value: &Value) {
        let [owner, member] = path else {
            return;
        };
        if owner != "self" {
            return;
        }
        let Some(class) = self.scopes.current_class().map(str::to_string) else {
            return;
        };
        if let Some(info) = self.records.classes.get_mut(&class) {
            info.members
                .entry(member.clone())
                .or_insert_with(|| Binding::new(value.ty.clone(), value.element.clone()));
        }
    }

    fn aug_assign(&mut self, aug: &AugAssign) -> EmitResult {
        let opcode = "augAssign";
        if aug.op == Operator::Pow {
            let current = self.eval(&aug.target.to_expr())?;
            let exponent = self.eval(&aug.expr)?;
            let power = self.backend.power(&current, &exponent);
            let power = self.check(power, opcode)?;
            let cast = power.ty.cast_to(&current.ty);
            let lines = match &aug.target {
                Target::Index { base, index } => {
                    let base = self.eval(base)?;
                    let index = self.eval(index)?;
                    self.backend
                        .index_assign(&base, &index, &power, cast.as_ref())
                }
                _ => {
                    let target = AssignTarget {
                        text: current.text.clone(),
                        ty: current.ty.clone(),
                        element: current.element.clone(),
                        declare: false,
                    };
                    self.backend.assign(&target, &power, cast.as_ref())
                }
            };
            return self.emit_lines(lines, opcode);
        }

        let lines = match &aug.target {
            Target::Index { base, index } => {
                let base = self.eval(base)?;
                let index = self.eval(index)?;
                let value = self.eval(&aug.expr)?;
                self.backend.array_increment(&base, &index, aug.op, &value)
            }
            target => {
                let current = self.eval(&target.to_expr())?;
                let value = self.eval(&aug.expr)?;
                self.backend.increment(&current, aug.op, &value)
            }
        };
        self.emit_lines(lines, opcode)
    }

    fn expression(&mut self, expr: &Expr) -> EmitResult {
        if let Expr::Call { callee, args } = expr {
            match callee.as_ref() {
                Expr::Var { name, .. }
                    if name == "print" && !self.records.functions.contains_key(name) =>
                {
                    return self.print(args);
                }
                Expr::DotAccess { path } if path.len() > 1 && path[path.len() - 1] == "append" => {
                    if let [Arg::Positional(item)] = args.as_slice() {
                        if self.append(&path[..path.len() - 1], item)? {
                            return Ok(());
                        }
                    }
                }
                _ => {}
            }
        }
        let value = self.eval(expr)?;
        let lines = self.backend.expression(&value);
        self.emit_lines(lines, expr.opcode())
    }

    fn print(&mut self, args: &[Arg]) -> EmitResult {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            match arg {
                Arg::Positional(expr) => values.push(self.eval(expr)?),
                Arg::Keyword { name, .. } => {
                    return Err(TranspileError::UnsupportedFeature {
                        feature: format!("keyword argument `{}` to print", name),
                        opcode: "call".to_string(),
                        target: self.target.clone(),
                    })
                }
            }
        }
        let lines = self.backend.print(&values);
        self.emit_lines(lines, "call")
    }

    /// `owner.append(item)` on an array. Returns false when `owner` is not an array.
    fn append(&mut self, owner: &[String], item: &Expr) -> Result<bool, TranspileError> {
        let array = self.eval(&Expr::DotAccess {
            path: owner.to_vec(),
        })?;
        if array.ty != ValueType::Array {
            return Ok(false);
        }
        let value = self.eval(item)?;
        let array = match array.element {
            Some(_) => array,
            None => {
                if let [name] = owner {
                    self.scopes.refine(
                        name,
                        Binding::new(ValueType::Array, Some(value.ty.clone())),
                    );
                }
                array.with_element(Some(value.ty.clone()))
            }
        };
        let lines = self.backend.array_append(&array, &value);
        self.emit_lines(lines, "call")?;
        Ok(true)
    }

    fn if_chain(&mut self, stmt: &IfStatement) -> EmitResult {
        let condition = self.eval(&stmt.expr)?;
        let lines = self.backend.if_open(&condition);
        self.emit_lines(lines, "ifStatement")?;
        self.block(&stmt.block)?;
        for clause in &stmt.elifs {
            let condition = self.eval(&clause.expr)?;
            let lines = self.backend.elif(&condition);
            self.emit_lines(lines, "elifStatement")?;
            self.nested(&clause.block, ScopeKind::Block)?;
        }
        if let Some(block) = &stmt.else_block {
            let lines = self.backend.else_open();
            self.emit_lines(lines, "elseStatement")?;
            self.nested(block, ScopeKind::Block)?;
        }
        let lines = self.backend.end_if();
        self.emit_lines(lines, "ifStatement")
    }

    fn for_loop(&mut self, stmt: &ForStatement) -> EmitResult {
        let opcode = "forStatement";
        match &stmt.iter {
            ForIter::Range(range) => {
                let bounds = RangeBounds {
                    from: self.eval(&range.from)?,
                    to: self.eval(&range.to)?,
                    step: self.eval(&range.step)?,
                };
                // The variable outlives the loop.
                let declare = self.scopes.lookup(&stmt.var).is_none();
                if declare {
                    self.scopes.declare(
                        stmt.var.clone(),
                        Binding::new(bounds.from.ty.clone(), None),
                    );
                }
                let lines = self.backend.for_range(&stmt.var, declare, &bounds);
                self.emit_lines(lines, opcode)?;
                self.block(&stmt.block)?;
            }
            ForIter::Each(expr) => {
                let iterable = self.eval(expr)?;
                let element = match iterable.ty {
                    ValueType::Array => iterable.element.clone().unwrap_or(ValueType::Unknown),
                    ValueType::Str => ValueType::Str,
                    _ => ValueType::Unknown,
                };
                let counter = self.next_counter();
                let lines = self.backend.for_each(&stmt.var, &iterable, &counter);
                self.emit_lines(lines, opcode)?;
                self.scopes.push(ScopeKind::Block);
                self.scopes
                    .declare(stmt.var.clone(), Binding::new(element, None));
                let result = stmt
                    .block
                    .iter()
                    .flatten()
                    .try_for_each(|node| self.emit(node));
                self.scopes.pop();
                result?;
            }
        }
        let lines = self.backend.end_for();
        self.emit_lines(lines, opcode)
    }

    fn def(&mut self, def: &DefStatement, class: Option<&str>) -> EmitResult {
        let opcode = "defStatement";
        let constructor = class.is_some() && matches!(def.name.as_str(), "__init__" | "new");
        let params: Vec<Param> = def
            .params
            .iter()
            .filter(|p| class.is_none() || p.name != "self")
            .cloned()
            .collect();

        let mut headers = Vec::with_capacity(params.len());
        for param in &params {
            let default = match &param.default {
                Some(expr) => Some(self.eval(expr)?),
                None => None,
            };
            let ty = match (param.declared, &default) {
                (Some(declared), _) => ValueType::from(declared),
                (None, Some(value)) => value.ty.clone(),
                (None, None) => ValueType::Unknown,
            };
            headers.push(ParamHeader {
                name: param.name.clone(),
                ty,
                default,
            });
        }

        let return_type = match (class, def.return_type) {
            (Some(class), _) if constructor => ValueType::Class(class.to_string()),
            (_, Some(ty)) => ValueType::from(ty),
            _ => ValueType::Unknown,
        };
        let key = match class {
            Some(class) => format!("{}.{}", class, def.name),
            None => def.name.clone(),
        };
        // Recorded before the body so recursive calls see it.
        self.records.functions.insert(
            key.clone(),
            Signature {
                params,
                return_type: return_type.clone(),
            },
        );

        let mut header = FuncHeader {
            name: def.name.clone(),
            params: headers,
            return_type,
            in_class: class.is_some(),
            constructor,
        };
        let lines = self.backend.func_open(&header);
        let lines = self.check(lines, opcode)?;
        let slot = self.push_header(lines)?;

        self.scopes.push(ScopeKind::Block);
        for param in &header.params {
            self.scopes
                .declare(param.name.clone(), Binding::new(param.ty.clone(), None));
        }
        self.frames.push(None);
        let result = self.function_body(def, &header);
        let returned = self.frames.pop().flatten();
        self.scopes.pop();
        result?;

        if let Some(inferred) = returned.filter(|_| header.return_type == ValueType::Unknown) {
            if let Some(signature) = self.records.functions.get_mut(&key) {
                signature.return_type = inferred.clone();
            }
            header.return_type = inferred;
            let lines = self.backend.func_open(&header);
            let lines = self.check(lines, opcode)?;
            self.replace_header(slot, lines)?;
        }

        let lines = self.backend.end_func();
        self.emit_lines(lines, opcode)
    }

    fn function_body(&mut self, def: &DefStatement, header: &FuncHeader) -> EmitResult {
        for param in &header.params {
            if let Some(default) = &param.default {
                let lines = self.backend.default_value(&param.name, default);
                self.emit_lines(lines, "defStatement")?;
            }
        }
        def.block
            .iter()
            .flatten()
            .try_for_each(|node| self.emit(node))
    }

    fn class(&mut self, class: &ClassStatement) -> EmitResult {
        let opcode = "classStatement";
        self.records.classes.insert(
            class.name.clone(),
            ClassInfo {
                parent: class.parent.clone(),
                members: HashMap::new(),
            },
        );
        let lines = self
            .backend
            .class_open(&class.name, class.parent.as_deref());
        self.emit_lines(lines, opcode)?;

        self.scopes.push(ScopeKind::Class(class.name.clone()));
        let outer = self.class_body.replace(class.name.clone());
        let result = class
            .block
            .iter()
            .flatten()
            .try_for_each(|node| self.emit(node));
        self.class_body = outer;
        self.scopes.pop();
        result?;

        let lines = self.backend.end_class();
        self.emit_lines(lines, opcode)
    }

    /// Another photon unit is compiled and inlined; anything else is a library import.
    fn import(&mut self, import: &ImportStatement) -> EmitResult {
        let module = import.module();
        if !self.imported.insert(module.clone()) {
            return Ok(());
        }
        if self.ancestry.contains(&module) {
            let mut chain = self.ancestry.clone();
            chain.push(module);
            return Err(TranspileError::ImportCycle(chain));
        }
        match self.transpiler.resolver.resolve(&module)? {
            Some(unit) => {
                let (compiled, records) =
                    self.transpiler
                        .compile(&unit, Some(module.as_str()), &self.ancestry)?;
                debug!(module = %module, file = %compiled.file_name, "inlined module");
                self.records.merge(records);
                self.imports
                    .extend(compiled.text.trim_end().lines().map(str::to_string));
                self.modules.push(compiled);
            }
            None => {
                let line = self
                    .backend
                    .system_import(&module, import.alias.as_deref());
                let line = self.check(line, "import")?;
                self.imports.push(line);
            }
        }
        Ok(())
    }
}
