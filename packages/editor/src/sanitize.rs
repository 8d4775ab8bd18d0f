//! Rich text sanitization hook.
//!
//! Rich text content is an opaque markup string. Before it reaches the tree
//! the session passes it through a [`Sanitizer`]; the policy itself lives
//! outside the editor.

pub trait Sanitizer {
    fn sanitize(&self, markup: &str) -> String;
}

/// Leaves markup untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl Sanitizer for PassThrough {
    fn sanitize(&self, markup: &str) -> String {
        markup.to_string()
    }
}

impl<F> Sanitizer for F
where
    F: Fn(&str) -> String,
{
    fn sanitize(&self, markup: &str) -> String {
        self(markup)
    }
}
