// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening subtraction for hosts of IfcRelVoidsElement

use super::GeometryRouter;
use crate::csg::subtract_mesh;
use crate::{Mesh, Result};
use ifc_lite_core::{DecodedEntity, EntityDecoder};
use rustc_hash::FxHashMap;

impl GeometryRouter {
    /// Process an element and cut out the openings recorded for it
    ///
    /// `void_index` maps host element ids to their opening element ids.
    /// Openings without usable geometry are skipped; the host mesh itself
    /// must build.
    pub fn process_element_with_voids(
        &self,
        element: &DecodedEntity,
        decoder: &mut EntityDecoder,
        void_index: &FxHashMap<u32, Vec<u32>>,
    ) -> Result<Mesh> {
        let opening_ids = match void_index.get(&element.id) {
            Some(ids) if !ids.is_empty() => ids,
            _ => return self.process_element(element, decoder),
        };

        let mut mesh = self.process_element(element, decoder)?;

        for &opening_id in opening_ids {
            let opening = match decoder.decode_by_id(opening_id) {
                Ok(entity) => entity,
                Err(_) => continue,
            };
            let opening_mesh = match self.process_element(&opening, decoder) {
                Ok(m) => m,
                Err(_) => continue,
            };

            let cut = subtract_mesh(&mesh, &opening_mesh)?;
            if !cut.is_empty() {
                mesh = cut;
            }
        }

        Ok(mesh)
    }
}
