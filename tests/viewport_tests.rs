use mercator_viewport::prelude::*;

/// Reference map states: flat city view, flat high zoom, and a pitched and
/// rotated view
fn test_viewports() -> Vec<ViewportConfig> {
    vec![
        ViewportConfig::new()
            .with_size(793.0, 775.0)
            .with_center(-122.42694203247012, 37.751537058389985)
            .with_zoom(11.5),
        ViewportConfig::new()
            .with_size(793.0, 775.0)
            .with_center(22.42694203247012, 20.751537058389985)
            .with_zoom(15.5),
        ViewportConfig::new()
            .with_size(793.0, 775.0)
            .with_center(42.42694203247012, 50.751537058389985)
            .with_zoom(15.5)
            .with_bearing(-44.48928121059271)
            .with_pitch(43.670797287818566),
    ]
}

fn assert_close<const N: usize>(actual: [f64; N], expected: [f64; N], tolerance: f64) {
    for i in 0..N {
        assert!(
            (actual[i] - expected[i]).abs() <= tolerance,
            "{actual:?} != {expected:?} (tolerance {tolerance})"
        );
    }
}

fn assert_finite<const N: usize>(values: [f64; N]) {
    assert!(values.iter().all(|v| v.is_finite()), "{values:?} is not finite");
}

#[test]
fn test_default_construction() {
    let viewport = Viewport::default();
    assert!(viewport.matrices().is_finite());
}

#[test]
fn test_zero_size_construction() {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = test_viewports()[0].with_size(0.0, 0.0);
    let viewport = Viewport::new(config);

    assert_eq!(viewport.width(), 0.0);
    assert_eq!(viewport.height(), 0.0);
    assert!(viewport.clamp_report().size_substituted);
    assert!(viewport.matrices().is_finite());

    assert_finite(viewport.project([-122.4, 37.7]));
    assert_finite(viewport.project([-122.4, 37.7, 100.0]));
    assert_finite(viewport.unproject([0.0, 0.0]));
    assert_finite(viewport.unproject([0.0, 0.0, 0.5]));
}

#[test]
fn test_zero_width_only() {
    let viewport = Viewport::new(test_viewports()[2].with_size(0.0, 775.0));
    assert!(viewport.matrices().is_finite());
    assert_finite(viewport.project([42.4, 50.7]));
}

#[test]
fn test_project_flat_round_trip() {
    for vc in test_viewports() {
        let viewport = Viewport::new(vc);
        for tc in test_viewports() {
            let lng_lat = [tc.longitude, tc.latitude];
            let xy = viewport.project_flat(lng_lat);
            assert_close(viewport.unproject_flat(xy), lng_lat, 1e-6);
        }
    }
}

#[test]
fn test_project_3d_round_trip() {
    for vc in test_viewports() {
        let viewport = Viewport::new(vc);
        for offset in [0.0, 0.5, 1.0, 5.0] {
            let lng_lat = [vc.longitude + offset, vc.latitude + offset];
            let pixel = viewport.project(lng_lat);
            assert_close(viewport.unproject(pixel), lng_lat, 1e-6);

            let lng_lat_alt = [vc.longitude + offset, vc.latitude + offset, 0.0];
            let pixel = viewport.project(lng_lat_alt);
            assert_close(viewport.unproject(pixel), lng_lat_alt, 1e-6);
        }
    }
}

#[test]
fn test_project_3d_round_trip_with_altitude() {
    for vc in test_viewports() {
        let viewport = Viewport::new(vc);
        for altitude in [-50.0, 10.0, 350.0] {
            let input = [vc.longitude + 0.01, vc.latitude - 0.02, altitude];
            let pixel = viewport.project(input);
            assert_close(viewport.unproject(pixel), input, 1e-6);
        }
    }
}

#[test]
fn test_project_2d_cross_check() {
    for vc in test_viewports() {
        let viewport = Viewport::new(vc);
        for tc in test_viewports() {
            let lng_lat = [tc.longitude, tc.latitude];
            let pixel = viewport.project(lng_lat);
            assert_close(viewport.unproject(pixel), lng_lat, 1e-6);
        }
    }
}

#[test]
fn test_round_trip_across_camera_angles() {
    let base = test_viewports()[0];
    for bearing in [-170.0, -45.0, 0.0, 30.0, 90.0, 180.0] {
        for pitch in [0.0, 15.0, 45.0, 60.0] {
            let viewport = Viewport::new(base.with_bearing(bearing).with_pitch(pitch));
            for (d_lng, d_lat) in [(0.0, 0.0), (0.05, -0.03), (-0.1, 0.08), (0.02, 0.02)] {
                let lng_lat = [base.longitude + d_lng, base.latitude + d_lat];
                assert_close(viewport.unproject(viewport.project(lng_lat)), lng_lat, 1e-6);

                let lng_lat_alt = [lng_lat[0], lng_lat[1], 120.0];
                assert_close(
                    viewport.unproject(viewport.project(lng_lat_alt)),
                    lng_lat_alt,
                    1e-6,
                );
            }
        }
    }
}

#[test]
fn test_center_projects_to_middle() {
    for vc in test_viewports() {
        let viewport = Viewport::new(vc);
        let pixel = viewport.project([vc.longitude, vc.latitude]);
        assert_close(pixel, [vc.width / 2.0, vc.height / 2.0], 1e-6);
    }
}

#[test]
fn test_pitched_off_center_round_trip() {
    let config = test_viewports()[0]
        .with_bearing(-44.49)
        .with_pitch(43.67);
    let viewport = Viewport::new(config);

    let lng_lat = [config.longitude + 5.0, config.latitude + 5.0];
    let pixel = viewport.project(lng_lat);
    assert_finite(pixel);
    assert_close(viewport.unproject(pixel), lng_lat, 1e-6);
}

#[test]
fn test_distance_scales() {
    for vc in test_viewports() {
        let viewport = Viewport::new(vc);
        let scales = viewport.get_distance_scales();
        for i in 0..3 {
            assert!((scales.pixels_per_meter[i] * scales.meters_per_pixel[i] - 1.0).abs() < 1e-9);
            assert!((scales.pixels_per_degree[i] * scales.degrees_per_pixel[i] - 1.0).abs() < 1e-9);
        }
        assert_eq!(*scales, get_distance_scales(vc.latitude, vc.zoom));
    }
}

#[test]
fn test_meter_deltas() {
    for vc in test_viewports() {
        let viewport = Viewport::new(vc);
        for tc in test_viewports() {
            let meters = [tc.longitude, tc.latitude, 0.0];
            let degrees = viewport.meters_to_lng_lat_delta(meters);
            assert_close(viewport.lng_lat_delta_to_meters(degrees), meters, 1e-6);

            let meters = [tc.longitude, tc.latitude];
            let degrees = viewport.meters_to_lng_lat_delta(meters);
            assert_close(viewport.lng_lat_delta_to_meters(degrees), meters, 1e-6);
        }
    }
}

#[test]
fn test_meter_delta_matches_projection_locally() {
    let config = test_viewports()[0];
    let viewport = Viewport::new(config);

    let delta = viewport.meters_to_lng_lat_delta([100.0, 100.0]);
    let moved = [config.longitude + delta[0], config.latitude + delta[1]];

    let a = viewport.project_flat([config.longitude, config.latitude]);
    let b = viewport.project_flat(moved);
    let pixels_per_meter = viewport.get_distance_scales().pixels_per_meter;
    assert!(((b[0] - a[0]) - 100.0 * pixels_per_meter[0]).abs() < 1e-3);
    assert!(((b[1] - a[1]) - 100.0 * pixels_per_meter[1]).abs() < 1e-3);
}

#[test]
fn test_viewport_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<Viewport>();
    assert_send_sync::<ViewportConfig>();
    assert_send_sync::<DistanceScales>();

    let config = test_viewports()[2];
    let viewport = Viewport::new(config);
    let expected = viewport.project([config.longitude + 0.01, config.latitude]);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let pixel = viewport.project([config.longitude + 0.01, config.latitude]);
                    (pixel, viewport.unproject(pixel))
                })
            })
            .collect();

        for handle in handles {
            let (pixel, lng_lat) = handle.join().unwrap();
            assert_eq!(pixel, expected);
            assert_close(lng_lat, [config.longitude + 0.01, config.latitude], 1e-6);
        }
    });
}

#[test]
fn test_config_from_json_builds_same_viewport() {
    let json = r#"{
        "width": 793,
        "height": 775,
        "longitude": 42.42694203247012,
        "latitude": 50.751537058389985,
        "zoom": 15.5,
        "bearing": -44.48928121059271,
        "pitch": 43.670797287818566
    }"#;
    let config = ViewportConfig::from_json_str(json).unwrap();
    assert_eq!(Viewport::new(config), Viewport::new(test_viewports()[2]));
}

#[test]
fn test_custom_tile_size_and_altitude() {
    let config = test_viewports()[0].with_tile_size(256.0).with_altitude(2.0).with_pitch(30.0);
    let viewport = Viewport::new(config);
    assert!((viewport.world_size() - 256.0 * 11.5_f64.exp2()).abs() < 1e-6);

    let lng_lat = [config.longitude + 0.05, config.latitude + 0.05];
    assert_close(viewport.unproject(viewport.project(lng_lat)), lng_lat, 1e-6);
    assert_close(
        viewport.project([config.longitude, config.latitude]),
        [config.width / 2.0, config.height / 2.0],
        1e-6,
    );
}

#[test]
fn test_view_projection_upload() {
    let viewport = Viewport::new(test_viewports()[2]);
    let columns = viewport.matrices().view_projection_array();
    let matrix = viewport.view_projection_matrix();
    for (c, column) in columns.iter().enumerate() {
        for (r, value) in column.iter().enumerate() {
            assert_eq!(*value, matrix[(r, c)] as f32);
        }
    }
    let expected = viewport.projection_matrix() * viewport.view_matrix();
    assert!((expected - matrix).abs().max() < 1e-9);
}
