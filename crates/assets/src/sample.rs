//! Writing small GLB files: the built-in sample model and the container encoder.

use glam::Vec3;

const GLB_MAGIC: u32 = 0x4654_6c67;
const GLB_VERSION: u32 = 2;
const CHUNK_JSON: u32 = 0x4e4f_534a;
const CHUNK_BIN: u32 = 0x004e_4942;

// glTF enum values
const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Wrap a glTF JSON document and its binary payload in a GLB container.
///
/// The BIN chunk is omitted when `bin` is empty.
pub fn encode_glb(json: &serde_json::Value, bin: &[u8]) -> Vec<u8> {
    let mut json_bytes = json.to_string().into_bytes();
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }
    let mut bin_bytes = bin.to_vec();
    while bin_bytes.len() % 4 != 0 {
        bin_bytes.push(0);
    }

    let mut total = 12 + 8 + json_bytes.len();
    if !bin_bytes.is_empty() {
        total += 8 + bin_bytes.len();
    }

    let mut out = Vec::with_capacity(total);
    out.extend(GLB_MAGIC.to_le_bytes());
    out.extend(GLB_VERSION.to_le_bytes());
    out.extend((total as u32).to_le_bytes());
    out.extend((json_bytes.len() as u32).to_le_bytes());
    out.extend(CHUNK_JSON.to_le_bytes());
    out.extend(json_bytes);
    if !bin_bytes.is_empty() {
        out.extend((bin_bytes.len() as u32).to_le_bytes());
        out.extend(CHUNK_BIN.to_le_bytes());
        out.extend(bin_bytes);
    }
    out
}

/// A single box spanning `min..max` as an indexed GLB without normals.
pub fn box_glb(min: Vec3, max: Vec3) -> Vec<u8> {
    #[rustfmt::skip]
    let corners = [
        [min.x, min.y, min.z], [max.x, min.y, min.z], [max.x, max.y, min.z], [min.x, max.y, min.z],
        [min.x, min.y, max.z], [max.x, min.y, max.z], [max.x, max.y, max.z], [min.x, max.y, max.z],
    ];
    #[rustfmt::skip]
    let indices: [u32; 36] = [
        4, 5, 6, 6, 7, 4, // +Z
        1, 0, 3, 3, 2, 1, // -Z
        5, 1, 2, 2, 6, 5, // +X
        0, 4, 7, 7, 3, 0, // -X
        7, 6, 2, 2, 3, 7, // +Y
        0, 1, 5, 5, 4, 0, // -Y
    ];

    let mut bin = Vec::new();
    for corner in &corners {
        for c in corner {
            bin.extend(c.to_le_bytes());
        }
    }
    let positions_len = bin.len();
    for i in indices {
        bin.extend(i.to_le_bytes());
    }
    let indices_len = bin.len() - positions_len;

    let json = serde_json::json!({
        "asset": { "version": "2.0", "generator": "glbview" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": "box", "mesh": 0 }],
        "meshes": [{
            "name": "box",
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 }]
        }],
        "materials": [{
            "name": "gel",
            "pbrMetallicRoughness": {
                "baseColorFactor": [0.46, 0.29, 0.64, 1.0],
                "metallicFactor": 0.0,
                "roughnessFactor": 0.5
            }
        }],
        "buffers": [{ "byteLength": bin.len() }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": positions_len, "target": ARRAY_BUFFER },
            { "buffer": 0, "byteOffset": positions_len, "byteLength": indices_len, "target": ELEMENT_ARRAY_BUFFER }
        ],
        "accessors": [
            {
                "bufferView": 0,
                "componentType": FLOAT,
                "count": corners.len(),
                "type": "VEC3",
                "min": [min.x, min.y, min.z],
                "max": [max.x, max.y, max.z]
            },
            {
                "bufferView": 1,
                "componentType": UNSIGNED_INT,
                "count": indices.len(),
                "type": "SCALAR"
            }
        ]
    });

    encode_glb(&json, &bin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_chunks_are_aligned() {
        let glb = box_glb(Vec3::ZERO, Vec3::ONE);
        assert_eq!(&glb[0..4], b"glTF");
        assert_eq!(u32::from_le_bytes(glb[4..8].try_into().unwrap()), 2);
        assert_eq!(u32::from_le_bytes(glb[8..12].try_into().unwrap()) as usize, glb.len());
        let json_len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
        assert_eq!(json_len % 4, 0);
        assert_eq!(&glb[16..20], b"JSON");
        assert_eq!(&glb[20 + json_len + 4..20 + json_len + 8], b"BIN\0");
    }

    #[test]
    fn empty_payload_has_no_bin_chunk() {
        let glb = encode_glb(&serde_json::json!({ "asset": { "version": "2.0" } }), &[]);
        let json_len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
        assert_eq!(glb.len(), 20 + json_len);
    }
}
