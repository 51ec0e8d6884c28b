// ===== chromaforge/src/palette/candidates.rs =====
use crate::palette::value::Value;

/// The ordered substitute colors considered for one slot during a
/// solve, plus the designated original. Built fresh per domain build
/// and discarded after the owning solve.
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    /// Live candidate list; domain factories append directly.
    pub list: Vec<Value>,
    original: Option<Value>,
}

impl Candidates {
    pub fn new() -> Self {
        Self::default()
    }

    /// A one-entry domain whose single candidate is also the original.
    pub fn singleton(value: Value) -> Self {
        Self {
            list: vec![value.clone()],
            original: Some(value),
        }
    }

    pub fn set_original(&mut self, value: Value) {
        self.original = Some(value);
    }

    /// The designated original, falling back to the first candidate
    /// when none was explicitly set.
    pub fn original(&self) -> Option<&Value> {
        self.original.as_ref().or_else(|| self.list.first())
    }

    pub fn value(&self, index: usize) -> &Value {
        &self.list[index]
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn original_falls_back_to_first_candidate() {
        let mut c = Candidates::new();
        assert!(c.original().is_none());

        let first = Value::from_rgb(Rgb::new(10, 20, 30));
        c.list.push(first.clone());
        c.list.push(Value::from_rgb(Rgb::new(40, 50, 60)));
        assert_eq!(c.original().map(Value::rgb), Some(first.rgb()));

        let explicit = Value::from_rgb(Rgb::new(200, 0, 0));
        c.set_original(explicit.clone());
        assert_eq!(c.original().map(Value::rgb), Some(explicit.rgb()));
    }
}
