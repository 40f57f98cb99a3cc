// Structural validation of expression trees

use super::node::AstNode;
use super::types::AstType;
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Severity};

impl AstNode {
    /// Whether this node has a child count its type accepts.
    ///
    /// Children are not inspected; see [`is_well_formed`](Self::is_well_formed).
    pub fn has_correct_number_arguments(&self) -> bool {
        let ty = self.ty();
        if ty == AstType::Unknown {
            return false;
        }
        ty.arity().accepts(self.num_children())
    }

    /// Whether this node and every descendant are well formed.
    ///
    /// Unknown nodes are never well formed. Lambda bound variables must be
    /// names.
    pub fn is_well_formed(&self) -> bool {
        if !self.has_correct_number_arguments() {
            return false;
        }
        if self.is_lambda() {
            let bvars = self.num_bvars();
            if !self.children()[..bvars].iter().all(|b| b.ty() == AstType::Name) {
                return false;
            }
        }
        self.children().iter().all(AstNode::is_well_formed)
    }

    /// Report every arity violation in the tree to `sink`.
    ///
    /// Returns the number of violations found.
    pub fn check_arguments(&self, sink: &mut dyn DiagnosticSink) -> usize {
        let mut count = 0;
        if !self.has_correct_number_arguments() {
            sink.report(Diagnostic::new(
                DiagnosticCode::OpsNeedCorrectNumberOfArgs,
                Severity::Error,
                format!(
                    "{:?} node has {} argument(s), expected {:?}",
                    self.ty(),
                    self.num_children(),
                    self.ty().arity()
                ),
            ));
            count += 1;
        }
        for child in self.children() {
            count += child.check_arguments(sink);
        }
        count
    }

    /// Whether the expression evaluates to a boolean.
    ///
    /// True for logical and relational operators and boolean constants. A
    /// piecewise is boolean when all of its values are. Calls of user
    /// functions cannot be resolved here and count as non-boolean.
    pub fn is_boolean(&self) -> bool {
        let ty = self.ty();
        if ty.is_logical() || ty.is_relational() || ty.is_boolean_constant() {
            return true;
        }
        if ty == AstType::Piecewise {
            let children = self.children();
            if children.is_empty() {
                return false;
            }
            // Values sit at even indices, the otherwise value included.
            return children.iter().step_by(2).all(AstNode::is_boolean);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorLog;

    fn x() -> AstNode {
        AstNode::new_name("x")
    }

    #[test]
    fn arity_per_shape() {
        let mut divide = AstNode::new(AstType::Divide);
        assert!(!divide.has_correct_number_arguments());
        divide.add_child(x()).unwrap();
        assert!(!divide.has_correct_number_arguments());
        divide.add_child(x()).unwrap();
        assert!(divide.has_correct_number_arguments());
        divide.add_child(x()).unwrap();
        assert!(!divide.has_correct_number_arguments());

        let plus = AstNode::new(AstType::Plus);
        assert!(plus.has_correct_number_arguments());

        let sin = AstNode::new_nary(AstType::Sin, vec![x(), x()]);
        assert!(!sin.has_correct_number_arguments());

        let time = AstNode::new(AstType::NameTime);
        assert!(time.has_correct_number_arguments());
        let delay = AstNode::new_unary(AstType::Delay, x());
        assert!(!delay.has_correct_number_arguments());
    }

    #[test]
    fn well_formed_recurses() {
        let good = AstNode::new_binary(
            AstType::Times,
            AstNode::new_unary(AstType::Sin, x()),
            AstNode::new_integer(2),
        );
        assert!(good.is_well_formed());

        let bad = AstNode::new_binary(
            AstType::Times,
            AstNode::new(AstType::Sin),
            AstNode::new_integer(2),
        );
        assert!(bad.has_correct_number_arguments());
        assert!(!bad.is_well_formed());

        assert!(!AstNode::default().is_well_formed());
    }

    #[test]
    fn lambda_bvars_must_be_names() {
        let ok = AstNode::new_lambda(vec![x()], x());
        assert!(ok.is_well_formed());
        let bad = AstNode::new_lambda(vec![AstNode::new_integer(1)], x());
        assert!(!bad.is_well_formed());
    }

    #[test]
    fn argument_check_reports_each_violation() {
        let tree = AstNode::new_binary(
            AstType::Plus,
            AstNode::new(AstType::Divide),
            AstNode::new_nary(AstType::Not, vec![x(), x()]),
        );
        let mut log = ErrorLog::new();
        assert_eq!(tree.check_arguments(&mut log), 2);
        assert!(log.contains(DiagnosticCode::OpsNeedCorrectNumberOfArgs));
    }

    #[test]
    fn boolean_analysis() {
        assert!(AstNode::new_binary(AstType::Lt, x(), x()).is_boolean());
        assert!(AstNode::new(AstType::ConstantTrue).is_boolean());
        assert!(!AstNode::new_binary(AstType::Plus, x(), x()).is_boolean());

        let boolean_pw = AstNode::new_piecewise(
            vec![(AstNode::new(AstType::ConstantTrue), x())],
            Some(AstNode::new(AstType::ConstantFalse)),
        );
        assert!(boolean_pw.is_boolean());
        let numeric_pw = AstNode::new_piecewise(vec![(AstNode::new_integer(1), x())], None);
        assert!(!numeric_pw.is_boolean());
    }
}
