//! Text visualizations of training progress and network structure

use crate::Network;
use crate::report::EpochRecord;

/// Plot a per-epoch curve (NDCG or loss)
pub fn plot_curve(title: &str, values: &[f64]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}:\n", title));
    out.push_str(&format!("{}\n", "-".repeat(title.len() + 1)));

    if values.is_empty() {
        out.push_str("No data available.\n");
        return out;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Avoid division by zero if all values are the same
    let range = if (max - min).abs() < 1e-12 { 0.0 } else { max - min };

    let height = 15;
    let width = values.len();
    let mut plot = vec![vec![' '; width]; height];

    for (i, &value) in values.iter().enumerate() {
        let normalized = if range == 0.0 { 0.5 } else { (value - min) / range };
        let row = ((1.0 - normalized) * (height - 1) as f64).round() as usize;
        plot[row.min(height - 1)][i] = '*';
    }

    for row in plot {
        out.push('|');
        out.extend(row);
        out.push_str("|\n");
    }
    out.push_str(&format!("+{}+\n", "-".repeat(width)));
    out.push_str(&format!("Min: {:.6}, Max: {:.6}\n", min, max));
    out.push_str(&format!("Epochs: 1 to {}\n", values.len()));
    out
}

/// Plot validation NDCG and both losses of a run
pub fn plot_records(records: &[EpochRecord]) -> String {
    let ndcg: Vec<f64> = records.iter().map(|r| r.ndcg).collect();
    let train: Vec<f64> = records.iter().map(|r| r.train_loss).collect();
    let validation: Vec<f64> = records.iter().map(|r| r.validation_loss).collect();

    [
        plot_curve("Validation NDCG", &ndcg),
        plot_curve("Training Loss", &train),
        plot_curve("Validation Loss", &validation),
    ].join("\n")
}

/// Histogram of the non-bias weights, 16 bins between the extremes
pub fn visualize_weights(network: &Network) -> String {
    let weights: Vec<f64> = network.edges().iter()
        .filter(|edge| !edge.is_bias() && !edge.is_dead())
        .map(|edge| edge.weight())
        .collect();

    let mut out = String::from("Weight Distribution:\n--------------------\n");
    if weights.is_empty() {
        out.push_str("No weights to visualize.\n");
        return out;
    }

    let num_bins = 16usize;
    let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bin_size = ((max - min) / num_bins as f64).max(1e-12);

    let mut bins = vec![0usize; num_bins];
    for &w in &weights {
        let bin = (((w - min) / bin_size) as usize).min(num_bins - 1);
        bins[bin] += 1;
    }

    let max_count = bins.iter().copied().max().unwrap_or(1).max(1);
    let bar_width = 50usize;
    for (i, &count) in bins.iter().enumerate() {
        let start = min + i as f64 * bin_size;
        out.push_str(&format!(
            "[{:+.3}, {:+.3}) {} ({})\n",
            start, start + bin_size, "#".repeat(count * bar_width / max_count), count
        ));
    }
    out.push_str(&format!("Total weights: {}\n", weights.len()));
    out
}

/// Layer sizes and edge counts
pub fn visualize_network_structure(network: &Network) -> String {
    let mut out = String::from("Network Structure:\n-----------------\n");
    let sizes = network.layer_sizes();

    out.push_str(&format!("Input: {} features\n", sizes[0]));
    for layer in 1..sizes.len() {
        let activation = network.layer(layer).first().map(|node| node.activation());
        out.push_str(&format!(
            "Layer {}: {} -> {} nodes ({:?})\n",
            layer, sizes[layer - 1], sizes[layer], activation
        ));
    }

    let dead = network.edges().iter().filter(|edge| edge.is_dead()).count();
    out.push_str(&format!("Total parameters: {} ({} pruned)\n", network.edges().len(), dead));
    out
}
