/// Parsed form of a stored locator string.
///
/// A composite reference is `<bucket>,<key>` with both parts non-empty and a
/// single separator. URLs and data URIs are always direct, even if they
/// happen to contain a comma.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator<'a> {
    Composite { bucket: &'a str, key: &'a str },
    Direct(&'a str),
}

impl<'a> Locator<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if raw.starts_with("data:") || raw.contains("://") || raw.starts_with('/') {
            return Locator::Direct(raw);
        }

        match raw.split_once(',') {
            Some((bucket, key))
                if !bucket.is_empty() && !key.is_empty() && !key.contains(',') =>
            {
                Locator::Composite { bucket, key }
            }
            _ => Locator::Direct(raw),
        }
    }

    pub fn composite(bucket: &str, key: &str) -> String {
        format!("{},{}", bucket, key)
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Locator::Composite { .. })
    }
}
