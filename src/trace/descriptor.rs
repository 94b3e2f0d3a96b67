use crate::trace::TraceError;

/// A parsed call descriptor borrowing from the raw trace entry
///
/// # Example
/// ```
/// use trout::trace::CallDescriptor;
///
/// let call = CallDescriptor::parse("open(/tmp/x, r)").unwrap();
/// assert_eq!(call.name(), "open");
/// assert_eq!(call.arguments().collect::<Vec<_>>(), vec!["/tmp/x", "r"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallDescriptor<'a> {
    raw: &'a str,
    name: &'a str,
    args: Option<&'a str>,
}

impl<'a> CallDescriptor<'a> {
    /// Parse `name` or `name(arg1,arg2,...)`
    ///
    /// # Errors
    /// Returns [`TraceError::MalformedDescriptor`] when the name is empty, the
    /// argument list is not closed by a final `)`, or a `)` appears without `(`.
    pub fn parse(raw: &'a str) -> Result<Self, TraceError> {
        let trimmed = raw.trim();

        let (name, args) = match trimmed.find('(') {
            Some(open) => {
                let inner = trimmed[open + 1..]
                    .strip_suffix(')')
                    .ok_or_else(|| malformed(raw, "unterminated argument list"))?;
                (&trimmed[..open], Some(inner))
            }
            None => {
                if trimmed.contains(')') {
                    return Err(malformed(raw, "closing parenthesis without argument list"));
                }
                (trimmed, None)
            }
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(malformed(raw, "empty call name"));
        }

        Ok(Self {
            raw: trimmed,
            name,
            args,
        })
    }

    /// Call name without the argument list
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Full descriptor as captured (surrounding whitespace trimmed)
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Whether the descriptor carried an argument list, even an empty one
    pub fn has_argument_list(&self) -> bool {
        self.args.is_some()
    }

    /// Individual arguments, trimmed. `name()` and `name` both yield nothing.
    pub fn arguments(&self) -> impl Iterator<Item = &'a str> {
        self.args
            .filter(|inner| !inner.trim().is_empty())
            .into_iter()
            .flat_map(|inner| inner.split(','))
            .map(str::trim)
    }

    /// Key used when comparing two calls
    ///
    /// With `ignore_arguments` only the name takes part, so `foo(1)` and
    /// `foo(2)` compare equal. Otherwise the full descriptor is used.
    pub fn comparison_key(&self, ignore_arguments: bool) -> &'a str {
        if ignore_arguments {
            self.name
        } else {
            self.raw
        }
    }

    /// Render a bare call name as a descriptor with an empty argument list
    pub fn render_empty(name: &str) -> String {
        format!("{}()", name)
    }
}

fn malformed(raw: &str, reason: &'static str) -> TraceError {
    TraceError::MalformedDescriptor {
        descriptor: raw.to_string(),
        reason,
    }
}
