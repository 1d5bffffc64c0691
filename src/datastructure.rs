use crate::entity::Annotation;
use ahash::AHashMap;

/// Lookup tables from a character offset to the tag of the annotation starting (or ending) at
/// this offset. When two annotations share an offset, the one inserted last wins.
#[derive(Debug, Clone, Default)]
pub(crate) struct OffsetTagMapping<'a> {
    starts: AHashMap<usize, &'a str>,
    ends: AHashMap<usize, &'a str>,
}

impl<'a> OffsetTagMapping<'a> {
    pub(crate) fn new<I: IntoIterator<Item = &'a Annotation>>(annotations: I) -> Self {
        annotations.into_iter().collect()
    }

    pub(crate) fn insert(&mut self, annotation: &'a Annotation) {
        self.starts.insert(annotation.start, annotation.tag.as_str());
        self.ends.insert(annotation.end, annotation.tag.as_str());
    }

    #[inline]
    pub(crate) fn starts_at(&self, offset: usize) -> Option<&'a str> {
        self.starts.get(&offset).copied()
    }

    #[inline]
    pub(crate) fn ends_at(&self, offset: usize) -> Option<&'a str> {
        self.ends.get(&offset).copied()
    }
}

impl<'a> FromIterator<&'a Annotation> for OffsetTagMapping<'a> {
    fn from_iter<T: IntoIterator<Item = &'a Annotation>>(iter: T) -> Self {
        let mut mapping = Self::default();
        for annotation in iter {
            mapping.insert(annotation);
        }
        mapping
    }
}
