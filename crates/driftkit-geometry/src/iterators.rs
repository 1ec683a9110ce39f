//! Lazy iteration over valid element IDs.
//!
//! Each iterator increments the least-significant index and carries into
//! the parent indices on overflow, visiting every in-range combination
//! exactly once in ID order. Iterators borrow the geometry, so a reload
//! cannot happen mid-iteration.

use driftkit_core::{EnclosureId, ModuleId, PlaneId, WireId};

use crate::geometry::GeometryCore;

/// Iterator over every valid enclosure ID.
#[derive(Debug, Clone)]
pub struct EnclosureIdIter<'g> {
    geometry: &'g GeometryCore,
    next: u32,
}

impl<'g> EnclosureIdIter<'g> {
    pub(crate) fn new(geometry: &'g GeometryCore) -> Self {
        Self { geometry, next: 0 }
    }
}

impl Iterator for EnclosureIdIter<'_> {
    type Item = EnclosureId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.geometry.n_enclosures() {
            return None;
        }
        let id = EnclosureId::new(self.next);
        self.next += 1;
        Some(id)
    }
}

/// Iterator over every valid module ID, in ID order.
#[derive(Debug, Clone)]
pub struct ModuleIdIter<'g> {
    geometry: &'g GeometryCore,
    next: Option<ModuleId>,
}

impl<'g> ModuleIdIter<'g> {
    pub(crate) fn new(geometry: &'g GeometryCore) -> Self {
        let first = (geometry.n_enclosures() > 0).then(|| ModuleId::new(0, 0));
        Self {
            geometry,
            next: first,
        }
    }
}

impl Iterator for ModuleIdIter<'_> {
    type Item = ModuleId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        // increment the module index, carrying into the enclosure index
        let mut enclosure = current.enclosure.enclosure;
        let mut module = current.module + 1;
        if module >= self.geometry.n_modules(current.enclosure) {
            module = 0;
            enclosure += 1;
        }
        self.next =
            (enclosure < self.geometry.n_enclosures()).then(|| ModuleId::new(enclosure, module));

        Some(current)
    }
}

/// Iterator over every valid plane ID, in ID order.
#[derive(Debug, Clone)]
pub struct PlaneIdIter<'g> {
    geometry: &'g GeometryCore,
    modules: ModuleIdIter<'g>,
    current_module: Option<ModuleId>,
    next_plane: u32,
}

impl<'g> PlaneIdIter<'g> {
    pub(crate) fn new(geometry: &'g GeometryCore) -> Self {
        let mut modules = ModuleIdIter::new(geometry);
        let current_module = modules.next();
        Self {
            geometry,
            modules,
            current_module,
            next_plane: 0,
        }
    }
}

impl Iterator for PlaneIdIter<'_> {
    type Item = PlaneId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let module = self.current_module?;
            if self.next_plane < self.geometry.n_planes(module) {
                let id = PlaneId::in_module(module, self.next_plane);
                self.next_plane += 1;
                return Some(id);
            }
            self.current_module = self.modules.next();
            self.next_plane = 0;
        }
    }
}

/// Iterator over every valid wire ID, in ID order.
#[derive(Debug, Clone)]
pub struct WireIdIter<'g> {
    geometry: &'g GeometryCore,
    planes: PlaneIdIter<'g>,
    current_plane: Option<PlaneId>,
    next_wire: u32,
}

impl<'g> WireIdIter<'g> {
    pub(crate) fn new(geometry: &'g GeometryCore) -> Self {
        let mut planes = PlaneIdIter::new(geometry);
        let current_plane = planes.next();
        Self {
            geometry,
            planes,
            current_plane,
            next_wire: 0,
        }
    }
}

impl Iterator for WireIdIter<'_> {
    type Item = WireId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let plane = self.current_plane?;
            if self.next_wire < self.geometry.n_wires(plane) {
                let id = WireId::in_plane(plane, self.next_wire);
                self.next_wire += 1;
                return Some(id);
            }
            self.current_plane = self.planes.next();
            self.next_wire = 0;
        }
    }
}
