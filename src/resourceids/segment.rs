/// The role a single path component plays in a resource ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// A fixed literal such as `subscriptions` or `resourceGroups`.
    Static(&'static str),
    /// A resource provider namespace such as `Microsoft.KeyVault`.
    ResourceProvider(&'static str),
    SubscriptionId,
    ResourceGroupName,
    /// A value chosen by the user (a resource name, a location, ...).
    UserSpecified,
    /// An arbitrary parent resource ID, spanning one or more components.
    Scope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub name: &'static str,
    pub kind: SegmentKind,
}

impl Segment {
    pub const fn static_segment(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::Static(value),
        }
    }

    pub const fn resource_provider(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::ResourceProvider(value),
        }
    }

    pub const fn subscription_id(name: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::SubscriptionId,
        }
    }

    pub const fn resource_group(name: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::ResourceGroupName,
        }
    }

    pub const fn user_specified(name: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::UserSpecified,
        }
    }

    pub const fn scope(name: &'static str) -> Self {
        Self {
            name,
            kind: SegmentKind::Scope,
        }
    }

    /// The literal this segment must match, for static and provider segments.
    pub fn fixed_value(&self) -> Option<&'static str> {
        match self.kind {
            SegmentKind::Static(value) | SegmentKind::ResourceProvider(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed_value().is_some()
    }

    /// Placeholder used when rendering example IDs.
    pub fn example_value(&self) -> String {
        match self.kind {
            SegmentKind::Static(value) | SegmentKind::ResourceProvider(value) => value.to_string(),
            SegmentKind::SubscriptionId => "12345678-1234-9876-4563-123456789012".to_string(),
            SegmentKind::ResourceGroupName => "example-resource-group".to_string(),
            SegmentKind::Scope => {
                "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/some-resource-group"
                    .to_string()
            }
            SegmentKind::UserSpecified => {
                let trimmed = self.name.strip_suffix("Name").unwrap_or(self.name);
                format!("{trimmed}Value")
            }
        }
    }

    /// Whether a single path component satisfies this segment.
    pub(crate) fn matches(&self, component: &str, insensitive: bool) -> bool {
        match self.fixed_value() {
            Some(expected) if insensitive => component.eq_ignore_ascii_case(expected),
            Some(expected) => component == expected,
            None => !component.is_empty(),
        }
    }
}
