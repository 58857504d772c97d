//! Autocomplete suggestions.

use std::collections::BTreeSet;

use crate::SearchEngine;

impl SearchEngine<'_> {
    /// Layer names, layer ids, and feature names containing `query`
    /// (ignoring case), in first-seen order without duplicates.
    ///
    /// Queries shorter than `min_suggestion_len` characters return
    /// nothing.
    #[must_use]
    pub fn get_suggestions(&self, query: &str, max_count: usize) -> Vec<String> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < self.options().min_suggestion_len || max_count == 0 {
            return Vec::new();
        }

        let mut seen = BTreeSet::new();
        let mut suggestions = Vec::new();

        for layer in self.layers {
            let feature_names = layer
                .features()
                .iter()
                .filter_map(|f| f.properties.text(&layer.name_property));
            let candidates = [layer.name.clone(), layer.id.clone()]
                .into_iter()
                .chain(feature_names);

            for candidate in candidates {
                if !candidate.to_lowercase().contains(&query) || !seen.insert(candidate.clone()) {
                    continue;
                }
                suggestions.push(candidate);
                if suggestions.len() == max_count {
                    return suggestions;
                }
            }
        }

        suggestions
    }
}
