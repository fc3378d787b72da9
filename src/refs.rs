use pdf_writer::Ref;
use std::collections::HashMap;

#[derive(Eq, PartialEq, Hash, Copy, Clone, Debug)]
pub enum RefType {
    Catalog,
    Info,
    PageTree,
    Page,
    Content,
}

/// Hands out PDF object ids, one per kind of object in a single-page document
pub struct ObjectReferences {
    refs: HashMap<RefType, Ref>,
    next_id: i32,
}

impl ObjectReferences {
    pub fn new() -> ObjectReferences {
        ObjectReferences {
            refs: HashMap::new(),
            next_id: 1,
        }
    }

    /// The id of the `ref_type` object, allocated the first time it is asked for
    pub fn id(&mut self, ref_type: RefType) -> Ref {
        let next_id = &mut self.next_id;
        *self.refs.entry(ref_type).or_insert_with(|| {
            let id = Ref::new(*next_id);
            *next_id += 1;
            id
        })
    }
}
