use crate::error::{LayoutError, LayoutResult};
use cfb_schema::{Enum, Object, Schema};
use indexmap::IndexMap;

/* Tree of dotted schema names; every level keeps declaration order */
#[derive(Debug, Default)]
pub struct Namespace<'a> {
  pub path: Vec<String>,
  pub children: IndexMap<String, Namespace<'a>>,
  pub objects: IndexMap<String, &'a Object>,
  pub enums: IndexMap<String, &'a Enum>,
}

/* Split "a.b.X" into (["a", "b"], "X") */
pub fn split_name(full_name: &str) -> (Vec<&str>, &str) {
  let mut segments: Vec<&str> = full_name.split('.').collect();
  let leaf = segments.pop().unwrap_or_default();
  (segments, leaf)
}

impl<'a> Namespace<'a> {
  pub fn build(schema: &'a Schema) -> LayoutResult<Self> {
    let mut root = Namespace::default();
    for object in &schema.objects {
      let (segments, leaf) = split_name(&object.name);
      let node = root.descend(&segments);
      node.check_free(leaf)?;
      node.objects.insert(leaf.to_string(), object);
    }
    for e in &schema.enums {
      let (segments, leaf) = split_name(&e.name);
      let node = root.descend(&segments);
      node.check_free(leaf)?;
      node.enums.insert(leaf.to_string(), e);
    }
    Ok(root)
  }

  fn descend(&mut self, segments: &[&str]) -> &mut Namespace<'a> {
    let mut node = self;
    for segment in segments {
      let mut path = node.path.clone();
      path.push(segment.to_string());
      node = node
        .children
        .entry(segment.to_string())
        .or_insert_with(|| Namespace { path, ..Namespace::default() });
    }
    node
  }

  fn check_free(&self, leaf: &str) -> LayoutResult<()> {
    if self.objects.contains_key(leaf) || self.enums.contains_key(leaf) {
      return Err(LayoutError::DuplicateName { namespace: self.dotted_path(), name: leaf.to_string() });
    }
    Ok(())
  }

  pub fn name(&self) -> Option<&str> {
    self.path.last().map(String::as_str)
  }

  pub fn dotted_path(&self) -> String {
    self.path.join(".")
  }

  pub fn is_root(&self) -> bool {
    self.path.is_empty()
  }

  /* True when this node or any descendant holds an object or enum */
  pub fn has_definitions(&self) -> bool {
    !self.objects.is_empty() || !self.enums.is_empty() || self.children.values().any(Namespace::has_definitions)
  }

  pub fn child(&self, name: &str) -> Option<&Namespace<'a>> {
    self.children.get(name)
  }

  /* Depth-first, parents before children */
  pub fn walk(&self) -> Vec<&Namespace<'a>> {
    let mut out = vec![self];
    for child in self.children.values() {
      out.extend(child.walk());
    }
    out
  }
}
