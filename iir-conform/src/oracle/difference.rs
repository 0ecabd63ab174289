use iir_conform_core::Sample;

/// Filter `inputs` with denominator `a` and numerator `b`.
///
/// The feed-forward sum covers `b[0..b.len()]` and the feedback sum
/// `a[1..a.len()]`; fixtures always carry `a.len() == b.len()`. Nothing is
/// normalized up front: the division by `a[0]` happens once per sample, last.
///
/// No fused multiply-add is used, so results are reproducible across targets.
///
/// Each sum starts from its first product rather than from `+0.0`, so the
/// sign of zero follows the literal formula; an empty sum is `+0.0`.
///
/// # Panics
/// If `a` is empty. `a[0] == 0` does not panic; the IEEE infinities and NaNs
/// it produces are returned as-is.
///
/// # Examples
/// ```
/// use iir_conform::oracle::apply;
///
/// let y = apply(&[1.0f32, 0.0], &[1.0, 0.0], &[1.0, 0.0, 0.0]);
/// assert_eq!(y, vec![1.0, 0.0, 0.0]);
/// ```
pub fn apply<S: Sample>(a: &[S], b: &[S], inputs: &[S]) -> Vec<S> {
    let a0 = a[0];
    let mut y: Vec<S> = Vec::with_capacity(inputs.len());

    for t in 0..inputs.len() {
        let feedforward = ordered_sum(
            b.iter()
                .take(t + 1)
                .enumerate()
                .map(|(k, &bk)| bk * inputs[t - k]),
        );
        let feedback = ordered_sum(
            a.iter()
                .enumerate()
                .skip(1)
                .take(t)
                .map(|(k, &ak)| ak * y[t - k]),
        );
        y.push((feedforward - feedback) / a0);
    }

    y
}

/// Left-to-right sum seeded with the first term, so a lone `-0.0` survives.
fn ordered_sum<S: Sample>(mut terms: impl Iterator<Item = S>) -> S {
    match terms.next() {
        Some(first) => terms.fold(first, |acc, term| acc + term),
        None => S::zero(),
    }
}
