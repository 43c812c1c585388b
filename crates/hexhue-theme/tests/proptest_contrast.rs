use hexhue_paint::color::Rgb;
use hexhue_theme::contrast::{
    adjust_for_contrast, check_contrast, contrast_ratio, fallback_for, relative_luminance,
};
use hexhue_theme::palette::{ColorPalette, ensure_minimum_colors, normalize_palette};
use proptest::prelude::*;

fn rgb() -> impl Strategy<Value = Rgb> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(Rgb::from)
}

proptest! {
    #[test]
    fn contrast_is_symmetric(a in rgb(), b in rgb()) {
        prop_assert!((contrast_ratio(a, b) - contrast_ratio(b, a)).abs() < 1e-12);
    }

    #[test]
    fn contrast_with_self_is_one(a in rgb()) {
        prop_assert!((contrast_ratio(a, a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn contrast_is_bounded(a in rgb(), b in rgb()) {
        let ratio = contrast_ratio(a, b);
        prop_assert!((1.0..=21.0 + 1e-9).contains(&ratio));
    }

    #[test]
    fn further_luminance_means_more_contrast(bg in rgb(), a in rgb(), b in rgb()) {
        let lbg = relative_luminance(bg);
        let (la, lb) = (relative_luminance(a), relative_luminance(b));
        // Same side of the background, b strictly further away.
        prop_assume!((la - lbg).signum() == (lb - lbg).signum());
        prop_assume!((lb - lbg).abs() > (la - lbg).abs() + 1e-9);
        prop_assert!(contrast_ratio(b, bg) > contrast_ratio(a, bg));
    }

    #[test]
    fn adjustment_converges_or_falls_back(fg in rgb(), bg in rgb()) {
        let adjusted = adjust_for_contrast(fg, bg, 4.5, 40.0);
        prop_assert!(
            check_contrast(adjusted, bg, false).passes || adjusted == fallback_for(bg),
            "{} on {} -> {}", fg, bg, adjusted
        );
    }

    #[test]
    fn normalized_weights_sum_to_one(weights in prop::collection::vec(0.0f64..100.0, 1..8)) {
        let colors = (0..weights.len()).map(|i| Rgb::new(i as u8 * 20, 40, 200)).collect();
        let n = normalize_palette(&ColorPalette::new(colors, weights));
        prop_assert!((n.total_weight() - 1.0).abs() < 1e-9);
        prop_assert!(n.weights.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn padding_reaches_minimum(len in 1usize..5, min in 0usize..12) {
        let p = ColorPalette::uniform((0..len).map(|i| Rgb::new(i as u8 * 30, 60, 90)).collect());
        let padded = ensure_minimum_colors(&p, min);
        prop_assert_eq!(padded.len(), len.max(min));
    }
}
