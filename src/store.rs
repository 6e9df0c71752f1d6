// 🗃️ Product Store - owns the product collection and the id counter
//
// The collection is published as immutable snapshots: every successful write
// builds a new sequence and swaps it in. A reader holding an older snapshot
// keeps seeing exactly what it saw when it called `list()`.
//
// The store does no locking. Hosts with more than one thread must serialize
// access themselves (see `SharedStore`).

use crate::product::{parse_price, Product, ProductId, ValidationError};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

/// Read-only view of the products as of the last completed mutation
pub type Snapshot = Arc<[Product]>;

/// Store behind a mutex, for hosts that call in from several threads
pub type SharedStore = Arc<Mutex<ProductStore>>;

#[derive(Debug, Clone)]
pub struct ProductStore {
    /// Insertion order, survivors keep their relative order on removal
    products: Snapshot,

    /// Strictly greater than every id ever assigned
    next_id: ProductId,
}

impl ProductStore {
    /// Create new empty store (first id is 1)
    pub fn new() -> Self {
        ProductStore {
            products: Arc::from(Vec::new()),
            next_id: 1,
        }
    }

    /// Wrap a fresh store for shared use
    pub fn shared() -> SharedStore {
        Arc::new(Mutex::new(ProductStore::new()))
    }

    /// Register a product. Returns `false` (and changes nothing) on invalid input.
    pub fn add(&mut self, name: &str, raw_price: &str, category: &str) -> bool {
        self.try_add(name, raw_price, category).is_ok()
    }

    /// Register a product, reporting why the input was rejected.
    ///
    /// Checks run in order: name, category, price parses, price > 0.
    pub fn try_add(
        &mut self,
        name: &str,
        raw_price: &str,
        category: &str,
    ) -> Result<Product, ValidationError> {
        let product = match self.validate(name, raw_price, category) {
            Ok(product) => product,
            Err(err) => {
                debug!(%err, "rejected product");
                return Err(err);
            }
        };

        let mut next: Vec<Product> = self.products.to_vec();
        next.push(product.clone());
        self.products = next.into();
        self.next_id += 1;

        debug!(id = product.id, name = %product.name, "added product");
        Ok(product)
    }

    fn validate(
        &self,
        name: &str,
        raw_price: &str,
        category: &str,
    ) -> Result<Product, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankName);
        }

        let category = category.trim();
        if category.is_empty() {
            return Err(ValidationError::BlankCategory);
        }

        let price = parse_price(raw_price)?;

        Ok(Product {
            id: self.next_id,
            name: name.to_string(),
            price,
            category: category.to_string(),
        })
    }

    /// Remove the product with this id. Unknown ids are a no-op.
    pub fn remove(&mut self, id: ProductId) {
        if !self.products.iter().any(|p| p.id == id) {
            trace!(id, "remove of unknown product ignored");
            return;
        }

        self.products = self
            .products
            .iter()
            .filter(|p| p.id != id)
            .cloned()
            .collect::<Vec<_>>()
            .into();

        debug!(id, "removed product");
    }

    /// Current snapshot (cheap: clones the `Arc`, not the products)
    pub fn list(&self) -> Snapshot {
        Arc::clone(&self.products)
    }

    /// Find product by id in the current snapshot
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.products.iter().find(|p| p.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Id the next successful add will receive
    pub fn next_id(&self) -> ProductId {
        self.next_id
    }
}

impl Default for ProductStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
