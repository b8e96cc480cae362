//! Unit tests for coopnav-core.

mod ids {
    use crate::NodeId;

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(NodeId(1).offset(), 0);
        assert_eq!(NodeId(30).offset(), 29);
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn display_is_bare_label() {
        assert_eq!(NodeId(7).to_string(), "7");
    }
}

mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(99);
        let mut b = SimRng::new(99);
        for _ in 0..32 {
            assert_eq!(a.uniform().to_bits(), b.uniform().to_bits());
        }
    }

    #[test]
    fn children_diverge_by_offset() {
        let mut parent_a = SimRng::new(7);
        let mut parent_b = SimRng::new(7);
        let mut c1 = parent_a.child(1);
        let mut c2 = parent_b.child(2);
        // Different offsets from identical parent state → different streams.
        let draws1: Vec<u64> = (0..8).map(|_| c1.uniform().to_bits()).collect();
        let draws2: Vec<u64> = (0..8).map(|_| c2.uniform().to_bits()).collect();
        assert_ne!(draws1, draws2);
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(0);
        let empty: [u32; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn uniform_in_unit_interval() {
        let mut rng = SimRng::new(1234);
        for _ in 0..1000 {
            let u = rng.uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }
}

mod round {
    use crate::{decimal_places, prob_eq, round_dp};

    #[test]
    fn round_dp_basic() {
        assert_eq!(round_dp(0.123_456, 5), 0.12346);
        assert_eq!(round_dp(0.1 + 0.2, 5), 0.3);
        assert_eq!(round_dp(2.5, 0), 3.0);
    }

    #[test]
    fn decimal_places_counts_shortest_repr() {
        assert_eq!(decimal_places(0.95, 10), 2);
        assert_eq!(decimal_places(0.4, 10), 1);
        assert_eq!(decimal_places(1.0, 10), 0);
        assert_eq!(decimal_places(0.123_456_789, 4), 4); // capped
    }

    #[test]
    fn prob_eq_tolerance() {
        assert!(prob_eq(1.0, 1.0 + 5e-7));
        assert!(!prob_eq(1.0, 1.0 + 5e-6));
    }
}
