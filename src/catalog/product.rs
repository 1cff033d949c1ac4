// src/catalog/product.rs
// =============================================================================
// Catalog entries and the embedded product list used when the remote
// catalog can't be loaded.
//
// Rust concepts:
// - serde derive: the same struct parses the remote JSON and prints --json
// - const arrays of tuples: fixed data compiled into the binary
// - Destructuring in closures: |&(id, name, folder)| unpacks each tuple
// =============================================================================

use serde::{Deserialize, Serialize};

/// One catalog entry.
///
/// `folder` names the directory under `Images/Products/` that holds this
/// product's numbered images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub folder: String,
}

impl Product {
    // Borrowed &str in, owned Strings stored
    pub fn new(id: u32, name: &str, folder: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            folder: folder.to_string(),
        }
    }
}

// (id, display name, image folder)
const EMBEDDED: [(u32, &str, &str); 21] = [
    (1, "Stoneware Mug", "stoneware-mug"),
    (2, "Glazed Serving Bowl", "glazed-serving-bowl"),
    (3, "Linen Table Runner", "linen-table-runner"),
    (4, "Walnut Cutting Board", "walnut-cutting-board"),
    (5, "Hand-Poured Candle", "hand-poured-candle"),
    (6, "Woven Storage Basket", "woven-storage-basket"),
    (7, "Brass Desk Lamp", "brass-desk-lamp"),
    (8, "Ceramic Planter", "ceramic-planter"),
    (9, "Wool Throw Blanket", "wool-throw-blanket"),
    (10, "Copper Watering Can", "copper-watering-can"),
    (11, "Leather Notebook", "leather-notebook"),
    (12, "Glass Carafe", "glass-carafe"),
    (13, "Oak Wall Shelf", "oak-wall-shelf"),
    (14, "Cotton Tote Bag", "cotton-tote-bag"),
    (15, "Enamel Teapot", "enamel-teapot"),
    (16, "Marble Coaster Set", "marble-coaster-set"),
    (17, "Rattan Pendant Shade", "rattan-pendant-shade"),
    (18, "Cast Iron Skillet", "cast-iron-skillet"),
    (19, "Bamboo Utensil Set", "bamboo-utensil-set"),
    (20, "Terracotta Vase", "terracotta-vase"),
    (21, "Felt Pin Cushion", "felt-pin-cushion"),
];

/// The built-in product list.
pub fn embedded_products() -> Vec<Product> {
    // A fresh Vec every call; callers own and may modify their copy
    EMBEDDED
        .iter()
        .map(|&(id, name, folder)| Product::new(id, name, folder))
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is the fallback a const array and not a JSON file?
//    - It can't go missing or fail to parse at runtime
//    - The compiler checks the entry count (the [_; 21] type)
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_embedded_list_has_21_unique_products() {
        let products = embedded_products();
        assert_eq!(products.len(), 21);

        let ids: HashSet<_> = products.iter().map(|p| p.id).collect();
        let folders: HashSet<_> = products.iter().map(|p| p.folder.as_str()).collect();
        assert_eq!(ids.len(), 21);
        assert_eq!(folders.len(), 21);
    }

    #[test]
    fn test_product_from_json() {
        let json = r#"[{"id": 7, "name": "Brass Desk Lamp", "folder": "brass-desk-lamp"}]"#;
        let products: Vec<Product> = serde_json::from_str(json).unwrap();
        assert_eq!(products, vec![Product::new(7, "Brass Desk Lamp", "brass-desk-lamp")]);
    }
}
