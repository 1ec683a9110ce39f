//! Geometry element builder.
//!
//! Walks the raw volume tree handed over by the loader, matches reserved
//! name prefixes to element roles, composes the cumulative transform along
//! each path, and materializes the typed element tree. Descent is true
//! recursion with an explicit depth bound; input deeper than the bound is
//! malformed and rejected with `DepthExceeded`.

use tracing::{debug, info};

use driftkit_core::{Error, GeometryError, Result};

use crate::elements::{AuxDetGeo, EnclosureGeo, ModuleGeo, OpDetGeo, PlaneGeo, WireGeo};
use crate::node::{
    VolumeNode, AUX_DET_PREFIX, ENCLOSURE_PREFIX, MODULE_ACTIVE_NAME, MODULE_PREFIX,
    OP_DET_PREFIX, PLANE_PREFIX, WIRE_PREFIX,
};
use crate::transform::LocalTransform;

/// Default bound on volume-tree nesting; observed detector descriptions
/// stay within 8 levels.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// A node matched during descent: the node itself, its composed world
/// transform, and the depth it was found at.
type Match<'n> = (&'n VolumeNode, LocalTransform, usize);

/// Builds the typed element tree from a raw volume tree.
#[derive(Debug, Clone)]
pub struct GeometryBuilder {
    max_depth: usize,
}

impl Default for GeometryBuilder {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl GeometryBuilder {
    /// A builder with a custom depth bound.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Materialize enclosures and auxiliary detectors from the raw tree.
    ///
    /// Elements come out in discovery order; sorting and ID assignment
    /// happen later, on the geometry core.
    pub fn build(&self, root: &VolumeNode) -> Result<(Vec<EnclosureGeo>, Vec<AuxDetGeo>)> {
        let root_transform = root.transform.clone();

        let mut enclosure_nodes = Vec::new();
        self.collect(root, root_transform.clone(), 0, ENCLOSURE_PREFIX, &mut enclosure_nodes)?;
        if enclosure_nodes.is_empty() {
            return Err(Error::not_found(format!(
                "no volume with prefix '{ENCLOSURE_PREFIX}' in tree rooted at '{}'",
                root.name
            )));
        }

        let mut enclosures = Vec::with_capacity(enclosure_nodes.len());
        for (node, transform, depth) in &enclosure_nodes {
            enclosures.push(self.build_enclosure(node, transform, *depth)?);
        }

        let mut aux_det_nodes = Vec::new();
        self.collect(root, root_transform, 0, AUX_DET_PREFIX, &mut aux_det_nodes)?;
        let aux_dets = aux_det_nodes
            .into_iter()
            .map(|(node, transform, _)| AuxDetGeo::new(node.name.clone(), transform, node.dims))
            .collect::<Vec<_>>();

        info!(
            enclosures = enclosures.len(),
            aux_dets = aux_dets.len(),
            "geometry elements built"
        );
        Ok((enclosures, aux_dets))
    }

    /// Recursive descent collecting every subtree whose root name carries
    /// `prefix`. Matched nodes are not descended into; `world` is the
    /// composed transform of `node` itself.
    fn collect<'n>(
        &self,
        node: &'n VolumeNode,
        world: LocalTransform,
        depth: usize,
        prefix: &str,
        hits: &mut Vec<Match<'n>>,
    ) -> Result<()> {
        if node.has_prefix(prefix) {
            hits.push((node, world, depth));
            return Ok(());
        }

        let deeper = depth + 1;
        if deeper >= self.max_depth {
            return Err(GeometryError::DepthExceeded {
                depth: deeper,
                max_depth: self.max_depth,
            }
            .into());
        }
        for child in &node.children {
            self.collect(child, world.compose(&child.transform), deeper, prefix, hits)?;
        }
        Ok(())
    }

    fn build_enclosure(
        &self,
        node: &VolumeNode,
        transform: &LocalTransform,
        depth: usize,
    ) -> Result<EnclosureGeo> {
        let mut module_nodes = Vec::new();
        self.collect(node, transform.clone(), depth, MODULE_PREFIX, &mut module_nodes)?;
        if module_nodes.is_empty() {
            return Err(Error::not_found(format!(
                "enclosure '{}' holds no volume with prefix '{MODULE_PREFIX}'",
                node.name
            )));
        }

        let mut modules = Vec::with_capacity(module_nodes.len());
        for (module_node, module_transform, module_depth) in &module_nodes {
            modules.push(self.build_module(module_node, module_transform, *module_depth)?);
        }

        let mut op_det_nodes = Vec::new();
        self.collect(node, transform.clone(), depth, OP_DET_PREFIX, &mut op_det_nodes)?;
        let op_dets = op_det_nodes
            .into_iter()
            .map(|(op_node, op_transform, _)| OpDetGeo::new(op_transform, op_node.dims))
            .collect::<Vec<_>>();

        debug!(
            enclosure = %node.name,
            modules = modules.len(),
            op_dets = op_dets.len(),
            "enclosure built"
        );
        Ok(EnclosureGeo::new(
            transform.clone(),
            node.dims,
            modules,
            op_dets,
        ))
    }

    fn build_module(
        &self,
        node: &VolumeNode,
        transform: &LocalTransform,
        depth: usize,
    ) -> Result<ModuleGeo> {
        // the active volume, when present, is a direct daughter; otherwise
        // the outer volume doubles as active
        let (active_dims, active_center) = node
            .children
            .iter()
            .find(|child| child.has_prefix(MODULE_ACTIVE_NAME))
            .map(|child| {
                let center = transform.compose(&child.transform).origin();
                (child.dims, center)
            })
            .unwrap_or((node.dims, transform.origin()));

        let mut plane_nodes = Vec::new();
        self.collect(node, transform.clone(), depth, PLANE_PREFIX, &mut plane_nodes)?;
        if plane_nodes.is_empty() {
            return Err(Error::not_found(format!(
                "module '{}' holds no volume with prefix '{PLANE_PREFIX}'",
                node.name
            )));
        }

        let mut planes = Vec::with_capacity(plane_nodes.len());
        for (plane_node, plane_transform, plane_depth) in &plane_nodes {
            planes.push(self.build_plane(plane_node, plane_transform, *plane_depth)?);
        }

        Ok(ModuleGeo::new(
            transform.clone(),
            node.dims,
            active_dims,
            active_center,
            planes,
        ))
    }

    fn build_plane(
        &self,
        node: &VolumeNode,
        transform: &LocalTransform,
        depth: usize,
    ) -> Result<PlaneGeo> {
        let mut wire_nodes = Vec::new();
        self.collect(node, transform.clone(), depth, WIRE_PREFIX, &mut wire_nodes)?;
        if wire_nodes.is_empty() {
            return Err(Error::not_found(format!(
                "plane '{}' holds no volume with prefix '{WIRE_PREFIX}'",
                node.name
            )));
        }

        let wires = wire_nodes
            .into_iter()
            .map(|(wire_node, wire_transform, _)| {
                WireGeo::new(wire_transform, wire_node.dims.half_length)
            })
            .collect::<Vec<_>>();

        Ok(PlaneGeo::new(transform.clone(), node.dims, wires))
    }
}
