//! Kendall's tau-b rank correlation with tie-corrected variance of S.

/// Kendall rank correlation between two paired samples.
#[derive(Debug, Clone, PartialEq)]
pub struct KendallTau {
    /// Tau-b: S / √((n0 − n1)(n0 − n2)).
    pub tau_b: f64,
    /// Concordant minus discordant pairs.
    pub s: f64,
    /// Variance of S under independence, corrected for ties in both samples.
    pub variance_s: f64,
    /// Normal approximation S / √Var(S).
    pub z: f64,
}

/// Compute Kendall's tau-b between `x` and `y`.
///
/// Returns `None` for fewer than 2 pairs, mismatched lengths, or when either
/// sample is entirely tied (tau-b undefined). Pairwise O(n²); meta-analyses
/// rarely exceed a few hundred studies.
pub fn kendall_tau_b(x: &[f64], y: &[f64]) -> Option<KendallTau> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }

    let mut s = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = sign(x[j] - x[i]);
            let dy = sign(y[j] - y[i]);
            s += dx * dy;
        }
    }

    let ties_x = tie_groups(x);
    let ties_y = tie_groups(y);

    let nf = n as f64;
    let n0 = nf * (nf - 1.0) / 2.0;
    let n1: f64 = ties_x.iter().map(|&t| t * (t - 1.0) / 2.0).sum();
    let n2: f64 = ties_y.iter().map(|&u| u * (u - 1.0) / 2.0).sum();

    let denom = ((n0 - n1) * (n0 - n2)).sqrt();
    if !(denom > 0.0) {
        return None;
    }
    let tau_b = s / denom;

    let variance_s = variance_of_s(nf, &ties_x, &ties_y);
    let z = if variance_s > 0.0 {
        s / variance_s.sqrt()
    } else {
        0.0
    };

    Some(KendallTau {
        tau_b,
        s,
        variance_s,
        z,
    })
}

/// Var(S) with the full tie correction (Kendall 1970).
fn variance_of_s(n: f64, ties_x: &[f64], ties_y: &[f64]) -> f64 {
    let v0 = n * (n - 1.0) * (2.0 * n + 5.0);
    let vt: f64 = ties_x.iter().map(|&t| t * (t - 1.0) * (2.0 * t + 5.0)).sum();
    let vu: f64 = ties_y.iter().map(|&u| u * (u - 1.0) * (2.0 * u + 5.0)).sum();
    let mut var = (v0 - vt - vu) / 18.0;

    if n > 2.0 {
        let t2: f64 = ties_x.iter().map(|&t| t * (t - 1.0) * (t - 2.0)).sum();
        let u2: f64 = ties_y.iter().map(|&u| u * (u - 1.0) * (u - 2.0)).sum();
        var += (t2 * u2) / (9.0 * n * (n - 1.0) * (n - 2.0));
    }
    let t1: f64 = ties_x.iter().map(|&t| t * (t - 1.0)).sum();
    let u1: f64 = ties_y.iter().map(|&u| u * (u - 1.0)).sum();
    var += (t1 * u1) / (2.0 * n * (n - 1.0));

    var.max(0.0)
}

/// Sizes of groups of exactly-equal values (groups of one omitted).
fn tie_groups(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut groups = Vec::new();
    let mut run = 1usize;
    for w in sorted.windows(2) {
        if w[0] == w[1] {
            run += 1;
        } else {
            if run > 1 {
                groups.push(run as f64);
            }
            run = 1;
        }
    }
    if run > 1 {
        groups.push(run as f64);
    }
    groups
}

fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
