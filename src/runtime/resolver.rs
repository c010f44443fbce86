//! The tree-walking resolver: evaluates a parsed command list into rendered
//! elements through a renderer capability.
//!
//! Dispatch is an exhaustive match over the closed AST union, so a node
//! kind without a resolution rule is a compile error, not a runtime one.
//! Node kinds that appear in a position they cannot occupy (an attribute
//! used as a value, a non-object drawn) are resolution errors.
//!
//! The first resolution error aborts the remaining evaluation; partially
//! accumulated output is discarded, never returned.

use std::rc::Rc;

use crate::diagnostics::{ArtError, ErrorContext};
use crate::runtime::scope::Scope;
use crate::runtime::value::{Renderer, SceneNode, Value};
use crate::syntax::ast::{AstNode, BinOp, Expr};

/// The evaluation context for one scope. A fresh context is derived (never
/// mutated in place) when entering a block, a mapper body, or an expanded
/// object's children; the renderer reference is always inherited from the
/// root.
pub struct Context<'r, T> {
    /// Lexical bindings, innermost frame first.
    pub scope: Scope<T>,
    /// The enclosing resolved object, consulted for attribute and block
    /// inheritance.
    pub parent: Option<Rc<SceneNode<T>>>,
    /// Values bound to the active mapper's parameters, or the one-slot
    /// inherited-attribute binding.
    pub args: Vec<Value<T>>,
    pub renderer: &'r mut dyn Renderer<Element = T>,
}

impl<'r, T: Clone> Context<'r, T> {
    /// Derives a context with a fresh scope frame pushed.
    fn with_fresh_frame(&mut self) -> Context<'_, T> {
        Context {
            scope: self.scope.child(),
            parent: self.parent.clone(),
            args: self.args.clone(),
            renderer: &mut *self.renderer,
        }
    }

    /// Derives a context with `args` replaced.
    fn with_args(&mut self, args: Vec<Value<T>>) -> Context<'_, T> {
        Context {
            scope: self.scope.clone(),
            parent: self.parent.clone(),
            args,
            renderer: &mut *self.renderer,
        }
    }

    /// Derives a context with the parent object replaced.
    fn with_parent(&mut self, parent: Rc<SceneNode<T>>) -> Context<'_, T> {
        Context {
            scope: self.scope.clone(),
            parent: Some(parent),
            args: self.args.clone(),
            renderer: &mut *self.renderer,
        }
    }
}

/// Resolver entry point: evaluates a command list against a fresh root
/// context, returning the rendered elements in command order.
pub fn resolve_program<R: Renderer>(
    commands: &[AstNode],
    renderer: &mut R,
) -> Result<Vec<R::Element>, ArtError> {
    let mut ctx = Context {
        scope: Scope::root(),
        parent: None,
        args: Vec::new(),
        renderer,
    };
    resolve_commands(commands, &mut ctx)
}

fn resolve_commands<T: Clone>(
    commands: &[AstNode],
    ctx: &mut Context<'_, T>,
) -> Result<Vec<T>, ArtError> {
    let mut output = Vec::new();
    for command in commands {
        if let Some(element) = resolve_command(command, ctx)? {
            output.push(element);
        }
    }
    Ok(output)
}

/// Resolves a node in value position.
fn resolve_value<T: Clone>(node: &AstNode, ctx: &mut Context<'_, T>) -> Result<Value<T>, ArtError> {
    match &node.value {
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Name(name) => Ok(ctx.scope.lookup(name).cloned().unwrap_or(Value::Absent)),
        Expr::Value(inner) => resolve_value(inner, ctx),
        Expr::Operation { left, op, right } => resolve_operation(left, op, right, node, ctx),
        Expr::Mapper { params, body } => resolve_mapper(params, body, ctx),
        Expr::Object { .. } => Ok(Value::Scene(resolve_object(node, ctx)?)),
        Expr::Operator(_)
        | Expr::Attribute { .. }
        | Expr::AttributeList(_)
        | Expr::Block(_)
        | Expr::Command { .. }
        | Expr::Args(_) => Err(ArtError::resolve(
            format!("cannot resolve {} as a value", node.value.kind_name()),
            ErrorContext::with_span(node.span),
        )),
    }
}

fn resolve_operation<T: Clone>(
    left: &AstNode,
    op: &AstNode,
    right: &AstNode,
    operation: &AstNode,
    ctx: &mut Context<'_, T>,
) -> Result<Value<T>, ArtError> {
    let l = resolve_value(left, ctx)?;
    let r = resolve_value(right, ctx)?;
    let op = expect_operator(op)?;
    match (op, l, r) {
        (BinOp::Add, Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
        (BinOp::Sub, Value::Number(l), Value::Number(r)) => Ok(Value::Number(l - r)),
        (BinOp::Mul, Value::Number(l), Value::Number(r)) => Ok(Value::Number(l * r)),
        // Division by zero keeps IEEE semantics (inf/NaN), never an error.
        (BinOp::Div, Value::Number(l), Value::Number(r)) => Ok(Value::Number(l / r)),
        (BinOp::Add, Value::Str(l), Value::Str(r)) => Ok(Value::Str(l + &r)),
        (op, l, r) => Err(ArtError::type_error(
            format!(
                "cannot apply '{}' to {} and {}",
                op.symbol(),
                l.type_name(),
                r.type_name()
            ),
            ErrorContext::with_span(operation.span),
        )),
    }
}

/// Binds the mapper's parameters positionally from the context's `args`
/// into a fresh frame, then evaluates the body there. The enclosing
/// bindings stay visible through the chain (lexical scoping).
fn resolve_mapper<T: Clone>(
    params: &[AstNode],
    body: &AstNode,
    ctx: &mut Context<'_, T>,
) -> Result<Value<T>, ArtError> {
    let mut bindings = Vec::with_capacity(params.len());
    for (position, param) in params.iter().enumerate() {
        let name = expect_name(param)?;
        if ctx.scope.is_bound(name) {
            return Err(ArtError::resolve(
                format!("expected '{name}' to be unbound"),
                ErrorContext::with_span(param.span),
            ));
        }
        let value = ctx.args.get(position).cloned().unwrap_or(Value::Absent);
        bindings.push((name.to_string(), value));
    }
    let mut mapper_ctx = ctx.with_fresh_frame();
    for (name, value) in bindings {
        mapper_ctx.scope.bind(name, value);
    }
    resolve_value(body, &mut mapper_ctx)
}

/// Resolves one attribute. A same-named entry in the parent object's
/// attribute list is exposed as the one-slot `args` while this attribute's
/// value expression evaluates, so an attribute can be redefined in terms of
/// its inherited value.
fn resolve_attribute<T: Clone>(
    node: &AstNode,
    ctx: &mut Context<'_, T>,
) -> Result<(String, Value<T>), ArtError> {
    let (name, value) = match &node.value {
        Expr::Attribute { name, value } => (name, value),
        other => {
            return Err(ArtError::resolve(
                format!("cannot resolve attribute of kind '{}'", other.kind_name()),
                ErrorContext::with_span(node.span),
            ))
        }
    };
    let inherited = ctx.parent.as_ref().and_then(|parent| {
        parent
            .attributes
            .iter()
            .find(|(attr_name, _)| attr_name == name)
            .map(|(_, attr_value)| attr_value.clone())
    });
    let resolved = match inherited {
        Some(inherited) => {
            let mut attr_ctx = ctx.with_args(vec![inherited]);
            resolve_value(value, &mut attr_ctx)?
        }
        None => resolve_value(value, ctx)?,
    };
    Ok((name.clone(), resolved))
}

/// Resolves an attribute list: inherited parent attributes concatenated
/// with the object's own, de-duplicated by name keeping the last
/// occurrence.
fn resolve_attribute_list<T: Clone>(
    node: &AstNode,
    ctx: &mut Context<'_, T>,
) -> Result<Vec<(String, Value<T>)>, ArtError> {
    let attributes = match &node.value {
        Expr::AttributeList(attributes) => attributes,
        other => {
            return Err(ArtError::resolve(
                format!("cannot resolve attributes of kind '{}'", other.kind_name()),
                ErrorContext::with_span(node.span),
            ))
        }
    };
    let inherited = ctx
        .parent
        .as_ref()
        .map(|parent| parent.attributes.clone())
        .unwrap_or_default();
    let mut own = Vec::with_capacity(attributes.len());
    for attribute in attributes {
        own.push(resolve_attribute(attribute, ctx)?);
    }
    let mut merged: Vec<(String, Value<T>)> = Vec::new();
    for (name, value) in inherited.into_iter().chain(own) {
        merged.retain(|(existing, _)| existing != &name);
        merged.push((name, value));
    }
    Ok(merged)
}

/// Resolves an object. A name bound to a previously defined scene is a
/// reference expansion: attributes and block resolve against the referenced
/// scene as parent. An unbound (or absent-valued) name is a native leaf for
/// the renderer.
fn resolve_object<T: Clone>(
    node: &AstNode,
    ctx: &mut Context<'_, T>,
) -> Result<SceneNode<T>, ArtError> {
    let (name_node, attributes_node, block_node) = match &node.value {
        Expr::Object {
            name,
            attributes,
            block,
        } => (name, attributes, block),
        other => {
            return Err(ArtError::resolve(
                format!("cannot resolve object of kind '{}'", other.kind_name()),
                ErrorContext::with_span(node.span),
            ))
        }
    };
    let name = expect_name(name_node)?.to_string();
    let referenced = ctx.scope.lookup(&name).cloned();
    match referenced {
        None | Some(Value::Absent) => Ok(SceneNode {
            name,
            attributes: resolve_attribute_list(attributes_node, ctx)?,
            block: resolve_block(block_node, ctx)?,
        }),
        Some(Value::Scene(parent_scene)) => {
            let expanded_name = parent_scene.name.clone();
            let mut child_ctx = ctx.with_parent(Rc::new(parent_scene));
            Ok(SceneNode {
                name: expanded_name,
                attributes: resolve_attribute_list(attributes_node, &mut child_ctx)?,
                block: resolve_block(block_node, &mut child_ctx)?,
            })
        }
        Some(other) => Err(ArtError::resolve(
            format!(
                "cannot expand '{name}': it is bound to a {}, not an object",
                other.type_name()
            ),
            ErrorContext::with_span(name_node.span),
        )),
    }
}

/// Resolves a block: a fresh frame for block-local `def`s, commands in
/// source order, output = the parent object's block concatenated with this
/// block's own non-absent command outputs.
fn resolve_block<T: Clone>(node: &AstNode, ctx: &mut Context<'_, T>) -> Result<Vec<T>, ArtError> {
    let commands = match &node.value {
        Expr::Block(commands) => commands,
        other => {
            return Err(ArtError::resolve(
                format!("cannot resolve block of kind '{}'", other.kind_name()),
                ErrorContext::with_span(node.span),
            ))
        }
    };
    let inherited = ctx
        .parent
        .as_ref()
        .map(|parent| parent.block.clone())
        .unwrap_or_default();
    let mut block_ctx = ctx.with_fresh_frame();
    let own = resolve_commands(commands, &mut block_ctx)?;
    Ok(inherited.into_iter().chain(own).collect())
}

/// Resolves a command. `def` binds into the current frame and produces no
/// output; `draw` renders its object; anything else is a resolution error.
fn resolve_command<T: Clone>(
    node: &AstNode,
    ctx: &mut Context<'_, T>,
) -> Result<Option<T>, ArtError> {
    let (name, args_node) = match &node.value {
        Expr::Command { name, args } => (name, args),
        other => {
            return Err(ArtError::resolve(
                format!("cannot resolve command of kind '{}'", other.kind_name()),
                ErrorContext::with_span(node.span),
            ))
        }
    };
    let args = match &args_node.value {
        Expr::Args(args) => args,
        other => {
            return Err(ArtError::resolve(
                format!(
                    "invalid args of kind '{}' for command '{name}'",
                    other.kind_name()
                ),
                ErrorContext::with_span(args_node.span),
            ))
        }
    };
    match name.as_str() {
        "def" => {
            let [name_node, value_node] = args.as_slice() else {
                return Err(ArtError::resolve(
                    "def expects a name and a value",
                    ErrorContext::with_span(args_node.span),
                ));
            };
            let def_name = expect_name(name_node)?;
            if ctx.scope.is_bound(def_name) {
                return Err(ArtError::resolve(
                    format!("expected '{def_name}' to be unbound"),
                    ErrorContext::with_span(name_node.span),
                ));
            }
            let def_name = def_name.to_string();
            let value = resolve_value(value_node, ctx)?;
            ctx.scope.bind(def_name, value);
            Ok(None)
        }
        "draw" => {
            let [object_node] = args.as_slice() else {
                return Err(ArtError::resolve(
                    "draw expects exactly one object",
                    ErrorContext::with_span(args_node.span),
                ));
            };
            if !matches!(object_node.value, Expr::Object { .. }) {
                return Err(ArtError::resolve(
                    format!(
                        "cannot render a {}; draw expects an object",
                        object_node.value.kind_name()
                    ),
                    ErrorContext::with_span(object_node.span),
                ));
            }
            let scene = resolve_object(object_node, ctx)?;
            Ok(Some(ctx.renderer.render(scene)))
        }
        other => Err(ArtError::resolve(
            format!("cannot understand command '{other}'"),
            ErrorContext::with_span(node.span),
        )),
    }
}

fn expect_name(node: &AstNode) -> Result<&str, ArtError> {
    match &node.value {
        Expr::Name(name) => Ok(name),
        other => Err(ArtError::resolve(
            format!("expected a name, got {}", other.kind_name()),
            ErrorContext::with_span(node.span),
        )),
    }
}

fn expect_operator(node: &AstNode) -> Result<BinOp, ArtError> {
    match &node.value {
        Expr::Operator(op) => Ok(*op),
        other => Err(ArtError::resolve(
            format!("expected an operator, got {}", other.kind_name()),
            ErrorContext::with_span(node.span),
        )),
    }
}
