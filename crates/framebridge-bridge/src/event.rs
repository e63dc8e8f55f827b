use serde::Serialize;

/// Local notification published for every accepted render message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEvent<A> {
    /// Render arguments exactly as the parent sent them.
    pub args: A,
}

impl<A> RenderEvent<A> {
    pub fn new(args: A) -> Self {
        Self { args }
    }
}
