//! In-memory extension document.
//!
//! Diagram elements have a kind, string properties and an ordered list of
//! extension nodes; each node has a kind, string properties and ordered children. This is the reference
//! [`ExtensionHost`] used by tests and by hosts without their own document model.

use std::collections::{BTreeMap, HashMap};

use taskops_types::{ExtensionHandle, ExtensionHost, Result, TaskOpsError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionNode {
    pub kind: String,
    pub properties: BTreeMap<String, String>,
    pub children: Vec<ExtensionHandle>,
}

#[derive(Debug, Clone, Default)]
struct Element {
    kind: String,
    properties: BTreeMap<String, String>,
    extensions: Vec<ExtensionHandle>,
}

#[derive(Debug, Clone, Default)]
pub struct ExtensionDocument {
    elements: BTreeMap<String, Element>,
    nodes: HashMap<ExtensionHandle, ExtensionNode>,
    next_handle: u64,
    id_counters: HashMap<String, u64>,
}

impl ExtensionDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a diagram element. Adding an existing element keeps its extensions.
    pub fn add_element(&mut self, element_id: impl Into<String>) {
        self.elements.entry(element_id.into()).or_default();
    }

    /// Register a diagram element of `kind`, such as `bpmn:DataObject`.
    ///
    /// Re-adding an existing element updates its kind and keeps everything else.
    pub fn add_element_of_kind(&mut self, element_id: impl Into<String>, kind: &str) {
        self.elements.entry(element_id.into()).or_default().kind = kind.to_string();
    }

    pub fn has_element(&self, element_id: &str) -> bool {
        self.elements.contains_key(element_id)
    }

    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn node(&self, handle: ExtensionHandle) -> Option<&ExtensionNode> {
        self.nodes.get(&handle)
    }

    /// Number of live extension nodes, attached or nested.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn alloc(&mut self, kind: &str) -> ExtensionHandle {
        self.next_handle += 1;
        let handle = ExtensionHandle(self.next_handle);
        self.nodes.insert(
            handle,
            ExtensionNode {
                kind: kind.to_string(),
                properties: BTreeMap::new(),
                children: Vec::new(),
            },
        );
        handle
    }

    fn node_mut(&mut self, handle: ExtensionHandle) -> Result<&mut ExtensionNode> {
        self.nodes
            .get_mut(&handle)
            .ok_or(TaskOpsError::UnknownExtension { handle })
    }

    fn node_ref(&self, handle: ExtensionHandle) -> Result<&ExtensionNode> {
        self.nodes
            .get(&handle)
            .ok_or(TaskOpsError::UnknownExtension { handle })
    }

    fn of_kind(&self, handles: &[ExtensionHandle], kind: &str) -> Vec<ExtensionHandle> {
        handles
            .iter()
            .copied()
            .filter(|h| self.nodes.get(h).is_some_and(|n| n.kind == kind))
            .collect()
    }

    fn drop_subtree(&mut self, handle: ExtensionHandle) {
        if let Some(node) = self.nodes.remove(&handle) {
            for child in node.children {
                self.drop_subtree(child);
            }
        }
    }

    fn element_mut(&mut self, element_id: &str) -> Result<&mut Element> {
        self.elements
            .get_mut(element_id)
            .ok_or_else(|| TaskOpsError::UnknownElement {
                element_id: element_id.to_string(),
            })
    }

    fn id_in_use(&self, id: &str) -> bool {
        self.nodes
            .values()
            .any(|n| n.properties.get("id").is_some_and(|v| v == id))
    }
}

impl ExtensionHost for ExtensionDocument {
    fn elements_of_kind(&self, kind: &str) -> Vec<String> {
        self.elements
            .iter()
            .filter(|(_, e)| e.kind == kind)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn element_property(&self, element_id: &str, name: &str) -> Result<Option<String>> {
        let element = self
            .elements
            .get(element_id)
            .ok_or_else(|| TaskOpsError::UnknownElement {
                element_id: element_id.to_string(),
            })?;
        Ok(element.properties.get(name).cloned())
    }

    fn set_element_property(&mut self, element_id: &str, name: &str, value: &str) -> Result<()> {
        self.element_mut(element_id)?
            .properties
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn extensions(&self, element_id: &str, kind: &str) -> Vec<ExtensionHandle> {
        self.elements
            .get(element_id)
            .map(|e| self.of_kind(&e.extensions, kind))
            .unwrap_or_default()
    }

    fn create_extension(&mut self, element_id: &str, kind: &str) -> Result<ExtensionHandle> {
        self.element_mut(element_id)?;
        let handle = self.alloc(kind);
        self.element_mut(element_id)?.extensions.push(handle);
        Ok(handle)
    }

    fn remove_extension(&mut self, element_id: &str, handle: ExtensionHandle) -> Result<bool> {
        let list = &mut self.element_mut(element_id)?.extensions;
        let Some(pos) = list.iter().position(|h| *h == handle) else {
            return Ok(false);
        };
        list.remove(pos);
        self.drop_subtree(handle);
        Ok(true)
    }

    fn create_child(&mut self, parent: ExtensionHandle, kind: &str) -> Result<ExtensionHandle> {
        self.node_ref(parent)?;
        let handle = self.alloc(kind);
        self.node_mut(parent)?.children.push(handle);
        Ok(handle)
    }

    fn children(&self, parent: ExtensionHandle, kind: &str) -> Result<Vec<ExtensionHandle>> {
        let node = self.node_ref(parent)?;
        Ok(self.of_kind(&node.children, kind))
    }

    fn remove_child(&mut self, parent: ExtensionHandle, child: ExtensionHandle) -> Result<bool> {
        let node = self.node_mut(parent)?;
        let Some(pos) = node.children.iter().position(|h| *h == child) else {
            return Ok(false);
        };
        node.children.remove(pos);
        self.drop_subtree(child);
        Ok(true)
    }

    fn property(&self, handle: ExtensionHandle, name: &str) -> Result<Option<String>> {
        Ok(self.node_ref(handle)?.properties.get(name).cloned())
    }

    fn set_property(&mut self, handle: ExtensionHandle, name: &str, value: &str) -> Result<()> {
        self.node_mut(handle)?
            .properties
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn next_id(&mut self, prefix: &str) -> String {
        loop {
            let counter = self.id_counters.entry(prefix.to_string()).or_insert(0);
            *counter += 1;
            let candidate = format!("{prefix}{counter}");
            if !self.id_in_use(&candidate) {
                return candidate;
            }
        }
    }
}
