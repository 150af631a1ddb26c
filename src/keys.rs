use crate::error::{Error, Result};

/// Key under which a product document is stored.
pub fn product_key(id: u64) -> String {
    format!("product:{}", id)
}

/// Draws `n` distinct product ids uniformly from `[1, max_id]`.
pub fn sample_product_ids(n: i64, max_id: u64) -> Result<Vec<u64>> {
    if n <= 0 || n as u64 > max_id {
        return Err(Error::InvalidSampleSize { n, max_id });
    }
    let mut rng = rand::thread_rng();
    let indices = rand::seq::index::sample(&mut rng, max_id as usize, n as usize);
    Ok(indices.into_iter().map(|idx| idx as u64 + 1).collect())
}

/// Draws `n` distinct product keys with ids bounded by `max_id`.
pub fn sample_product_keys(n: i64, max_id: u64) -> Result<Vec<String>> {
    let ids = sample_product_ids(n, max_id)?;
    Ok(ids.into_iter().map(product_key).collect())
}
