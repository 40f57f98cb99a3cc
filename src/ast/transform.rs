// Whole-tree rewrites and queries

use super::node::AstNode;
use super::types::AstType;

impl AstNode {
    /// Rewrite n-ary `plus`, `times`, `and`, `or` and `xor` nodes with more
    /// than two children into left-nested binary nodes, recursively.
    ///
    /// `and(x, y, z)` becomes `and(and(x, y), z)`.
    pub fn reduce_to_binary(&mut self) {
        if let Some(f) = self.function_mut() {
            for child in &mut f.children {
                child.reduce_to_binary();
            }
        }

        let ty = self.ty();
        if !ty.is_associative() || self.num_children() <= 2 {
            return;
        }
        let mut rest = self.take_children().into_iter();
        let (Some(first), Some(second)) = (rest.next(), rest.next()) else {
            return;
        };
        let mut nested = AstNode::new_binary(ty, first, second);
        let last = rest.next_back();
        for next in rest {
            nested = AstNode::new_binary(ty, nested, next);
        }
        let mut children = vec![nested];
        children.extend(last);
        self.set_children(children);
    }

    /// Rename every reference to the identifier `old`: plain names and
    /// user-function calls.
    pub fn rename_sid_refs(&mut self, old: &str, new: &str) {
        let renamed = match self.ty() {
            AstType::Name | AstType::Function => self.name() == Some(old),
            _ => false,
        };
        if renamed {
            self.set_name(new);
        }
        if let Some(f) = self.function_mut() {
            for child in &mut f.children {
                child.rename_sid_refs(old, new);
            }
        }
    }

    /// Rename the units of every literal carrying `old` units.
    pub fn rename_unit_sid_refs(&mut self, old: &str, new: &str) {
        if self.units() == Some(old) {
            // Only numbers carry units.
            let _ = self.set_units(new);
        }
        if let Some(f) = self.function_mut() {
            for child in &mut f.children {
                child.rename_unit_sid_refs(old, new);
            }
        }
    }

    /// Replace every plain name `bvar` by a copy of `arg`.
    ///
    /// Used to expand calls of function definitions: the lambda body is
    /// copied and each bound variable replaced by the call argument.
    pub fn replace_argument(&mut self, bvar: &str, arg: &AstNode) {
        if self.ty() == AstType::Name && self.name() == Some(bvar) {
            let is_child = self.is_child;
            *self = arg.deep_copy();
            self.is_child = is_child;
            return;
        }
        if let Some(f) = self.function_mut() {
            for child in &mut f.children {
                child.replace_argument(bvar, arg);
            }
        }
    }

    /// Nodes of the tree matching `predicate`, in pre-order.
    pub fn list_of_nodes<F>(&self, predicate: F) -> Vec<&AstNode>
    where
        F: Fn(&AstNode) -> bool,
    {
        let mut out = Vec::new();
        self.collect_nodes(&predicate, &mut out);
        out
    }

    fn collect_nodes<'a, F>(&'a self, predicate: &F, out: &mut Vec<&'a AstNode>)
    where
        F: Fn(&AstNode) -> bool,
    {
        if predicate(self) {
            out.push(self);
        }
        for child in self.children() {
            child.collect_nodes(predicate, out);
        }
    }

    /// Whether any node of the tree satisfies `predicate`.
    pub fn any_node<F>(&self, predicate: F) -> bool
    where
        F: Fn(&AstNode) -> bool + Copy,
    {
        predicate(self) || self.children().iter().any(|c| c.any_node(predicate))
    }

    /// Whether the tree references the name `name`.
    pub fn contains_name(&self, name: &str) -> bool {
        self.any_node(|n| n.ty() == AstType::Name && n.name() == Some(name))
    }

    /// Whether the tree contains a node of type `ty`.
    pub fn contains_type(&self, ty: AstType) -> bool {
        self.any_node(|n| n.ty() == ty)
    }

    /// Whether the tree refers to the simulation time csymbol.
    pub fn uses_time(&self) -> bool {
        self.contains_type(AstType::NameTime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> AstNode {
        AstNode::new_name(s)
    }

    #[test]
    fn reduce_and_of_three() {
        let mut node = AstNode::new_nary(AstType::And, vec![name("x"), name("y"), name("z")]);
        node.reduce_to_binary();
        assert_eq!(node.ty(), AstType::And);
        assert_eq!(node.num_children(), 2);
        let left = node.child(0).unwrap();
        assert_eq!(left.ty(), AstType::And);
        assert_eq!(left.child(0).and_then(AstNode::name), Some("x"));
        assert_eq!(left.child(1).and_then(AstNode::name), Some("y"));
        assert_eq!(node.child(1).and_then(AstNode::name), Some("z"));
        assert!(node.is_well_formed());
    }

    #[test]
    fn reduce_nests_left_and_recurses() {
        let inner = AstNode::new_nary(AstType::Times, vec![name("a"), name("b"), name("c")]);
        let mut node = AstNode::new_nary(
            AstType::Plus,
            vec![inner, name("d"), name("e"), name("f")],
        );
        node.reduce_to_binary();
        assert_eq!(node.num_children(), 2);
        assert_eq!(node.child(1).and_then(AstNode::name), Some("f"));
        let times = node.list_of_nodes(|n| n.ty() == AstType::Times);
        assert_eq!(times.len(), 2);
        assert!(times.iter().all(|n| n.num_children() == 2));

        let mut minus = AstNode::new_nary(AstType::Minus, vec![name("a"), name("b")]);
        minus.reduce_to_binary();
        assert_eq!(minus.num_children(), 2);
    }

    #[test]
    fn rename_references() {
        let mut node = AstNode::new_binary(
            AstType::Plus,
            name("k1"),
            AstNode::new_function("k1", vec![name("k2")]),
        );
        node.rename_sid_refs("k1", "k3");
        assert!(!node.contains_name("k1"));
        assert!(node.contains_name("k3"));
        assert_eq!(node.child(1).and_then(AstNode::name), Some("k3"));
        assert!(node.contains_name("k2"));
    }

    #[test]
    fn rename_units() {
        let mut lit = AstNode::new_integer(3);
        lit.set_units("mole").unwrap();
        let mut node = AstNode::new_binary(AstType::Times, lit, name("x"));
        node.rename_unit_sid_refs("mole", "mmol");
        assert_eq!(node.child(0).and_then(AstNode::units), Some("mmol"));
    }

    #[test]
    fn replace_argument_substitutes_copies() {
        let mut body = AstNode::new_binary(AstType::Times, name("x"), name("x"));
        let arg = AstNode::new_binary(AstType::Plus, name("a"), AstNode::new_integer(1));
        body.replace_argument("x", &arg);
        assert!(!body.contains_name("x"));
        assert_eq!(body.child(0), Some(&arg));
        assert!(body.child(0).is_some_and(AstNode::is_child));

        let mut root = name("x");
        root.replace_argument("x", &arg);
        assert_eq!(root, arg);
    }

    #[test]
    fn list_of_nodes_is_preorder() {
        let node = AstNode::new_binary(
            AstType::Plus,
            AstNode::new_binary(AstType::Times, name("a"), name("b")),
            name("c"),
        );
        let names: Vec<_> = node
            .list_of_nodes(AstNode::is_name)
            .into_iter()
            .filter_map(AstNode::name)
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert!(!node.uses_time());
    }
}
