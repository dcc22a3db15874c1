//! Resolves which declared symbols a call site is checked as.
//!
//! A call to `Sub::x()` where `x` is declared in `Base` is checked against
//! rules as `Base::x`; if `x` is also declared by an interface, the call is
//! checked as that interface's member too. Inheritance, interfaces and
//! traits are not told apart here; the analyzer front-end flattens them
//! into `declaring` and `also_declared_in`.

use crate::call_site::CallSite;
use crate::symbol::Symbol;

/// Returns the symbols to match rules against, in priority order:
/// the declaring symbol first, then each extra declaration.
///
/// Duplicates (by normalized name) are dropped.
#[must_use]
pub fn candidates(call: &CallSite) -> Vec<&Symbol> {
    let mut out: Vec<&Symbol> = Vec::with_capacity(1 + call.also_declared().len());
    for symbol in std::iter::once(call.declaring()).chain(call.also_declared()) {
        if !out.iter().any(|s| s.normalized() == symbol.normalized()) {
            out.push(symbol);
        }
    }
    out
}

/// Returns `(as Invoked::name())` when the call was written through a
/// different symbol than the one the rule matched.
#[must_use]
pub fn alias_note(invoked: &Symbol, candidate: &Symbol) -> Option<String> {
    (invoked.normalized() != candidate.normalized())
        .then(|| format!("(as {})", invoked.display_call()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str) -> Symbol {
        Symbol::method(name).unwrap()
    }

    #[test]
    fn declaring_comes_first() {
        let call = CallSite::new(method("Interfaces\\Implementation::x"), "a.php", 74)
            .also_declared_in(method("Interfaces\\BaseInterface::x"));
        let names: Vec<String> = candidates(&call).iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            vec!["Interfaces\\Implementation::x", "Interfaces\\BaseInterface::x"]
        );
    }

    #[test]
    fn duplicates_are_dropped() {
        let call = CallSite::new(method("Inheritance\\Sub::x"), "a.php", 22)
            .declared_as(method("Inheritance\\Base::x"))
            .also_declared_in(method("inheritance\\base::X"))
            .also_declared_in(method("Inheritance\\Contract::x"));
        let names: Vec<String> = candidates(&call).iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["Inheritance\\Base::x", "Inheritance\\Contract::x"]);
    }

    #[test]
    fn note_only_when_names_differ() {
        let sub = method("Inheritance\\Sub::x");
        let base = method("Inheritance\\Base::x");
        assert_eq!(
            alias_note(&sub, &base).as_deref(),
            Some("(as Inheritance\\Sub::x())")
        );
        assert_eq!(alias_note(&base, &base), None);
        assert_eq!(alias_note(&method("inheritance\\BASE::x"), &base), None);
    }
}
