use super::types::EndpointDescriptor;

/// Endpoints that share a primary tag, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct TagGroup<'a> {
    pub tag: &'a str,
    pub endpoints: Vec<&'a EndpointDescriptor>,
}

/// Group endpoints by their first tag.
///
/// Groups appear in order of first occurrence and keep the input order of
/// their endpoints; nothing is re-sorted. Each endpoint lands in exactly one
/// group.
pub fn partition_by_tag(endpoints: &[EndpointDescriptor]) -> Vec<TagGroup<'_>> {
    let mut groups: Vec<TagGroup<'_>> = Vec::new();
    for endpoint in endpoints {
        let tag = endpoint.primary_tag();
        match groups.iter_mut().find(|g| g.tag == tag) {
            Some(group) => group.endpoints.push(endpoint),
            None => groups.push(TagGroup {
                tag,
                endpoints: vec![endpoint],
            }),
        }
    }
    groups
}
