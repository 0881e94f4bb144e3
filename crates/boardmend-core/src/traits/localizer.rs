//! Message localization capability.

use std::fmt::Display;

/// Resolves message keys to templates and renders them.
///
/// Templates use `{}` placeholders filled positionally.
pub trait Localizer {
    /// Template for `key`, if known.
    fn text(&self, key: &str) -> Option<&str>;

    /// Render `key` with `args`. Unknown keys render as the key itself so a
    /// missing translation never hides a finding.
    fn render(&self, key: &str, args: &[&dyn Display]) -> String {
        let template = self.text(key).unwrap_or(key);
        let mut out = String::with_capacity(template.len() + args.len() * 8);
        let mut args = args.iter();
        let mut rest = template;
        while let Some(pos) = rest.find("{}") {
            out.push_str(&rest[..pos]);
            match args.next() {
                Some(arg) => out.push_str(&arg.to_string()),
                None => out.push_str("{}"),
            }
            rest = &rest[pos + 2..];
        }
        out.push_str(rest);
        out
    }
}
