//! Registry + guard behaviour against the in-process backend.

use std::cell::Cell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::block_on;
use serde_json::{json, Value};

use ui::charts::config::{ChartData, Paint};
use ui::charts::strategies::gauge::normalize;
use ui::charts::{
    shape, BackendError, ChartInputData, ChartKind, ChartOptions, ChartSource, ChartStudio,
    ChartType, MemoryBackend, NamedSeries, Renderer, RendererConfig,
};

const CANVASES: [&str; 3] = ["chartA", "chartB", "chartC"];

fn studio() -> ChartStudio<MemoryBackend> {
    ChartStudio::new(MemoryBackend::with_canvases(CANVASES))
}

fn monthly() -> ChartInputData {
    ChartInputData::series("RNCs", ["Jan", "Fev", "Mar"], vec![5.0, 12.0, 8.0])
}

fn opts() -> ChartOptions {
    ChartOptions::default()
}

#[test]
fn at_most_one_instance_per_canvas_across_any_sequence() {
    let studio = studio();
    let backend = studio.backend().clone();
    // A foreign chart left behind by some other code path.
    backend.bind_foreign(
        "chartB",
        RendererConfig::new(ChartType::Bar, ChartData::default(), json!({})),
    );

    for step in 0..60usize {
        let canvas = CANVASES[step % CANVASES.len()];
        match step % 5 {
            0 | 1 | 3 => {
                studio.create(canvas, ChartKind::TimeComparison, &monthly(), &opts());
            }
            2 => studio.destroy(canvas),
            _ => studio.update(canvas, &ChartInputData::series("RNCs", ["Abr"], vec![1.0])),
        }
        for id in CANVASES {
            assert!(backend.live_on(id) <= 1, "step {step}: {id} has several charts");
        }
    }
}

#[test]
fn destroy_twice_is_harmless() {
    let studio = studio();
    studio.create("chartA", ChartKind::Gauge, &ChartInputData::gauge(1.0, 0.0, 2.0), &opts());
    studio.destroy("chartA");
    studio.destroy("chartA");
    assert_eq!(studio.backend().live_on("chartA"), 0);
}

#[test]
fn overlapping_creates_instantiate_once() {
    let studio = studio();
    let backend = studio.backend().clone();
    let options = opts();
    let (tx, rx) = oneshot::channel::<Option<ChartInputData>>();

    block_on(async {
        let first = studio.create_when_ready(
            "chartA",
            ChartKind::TimeComparison,
            async { rx.await.ok().flatten() },
            &options,
        );
        futures::pin_mut!(first);
        assert!(futures::poll!(first.as_mut()).is_pending());

        // Second request while the first awaits its data.
        let second = studio
            .create_when_ready("chartA", ChartKind::TimeComparison, async { Some(monthly()) }, &options)
            .await;
        assert!(second.is_none());

        tx.send(Some(monthly())).unwrap();
        assert!(first.await.is_some());
    });

    assert_eq!(backend.instantiations(), 1);
    assert_eq!(backend.live_on("chartA"), 1);
    assert!(!studio.is_in_flight("chartA"));
}

#[test]
fn resize_during_refresh_keeps_one_instance() {
    let studio = studio();
    let backend = studio.backend().clone();
    let options = opts();
    studio.create("chartA", ChartKind::TimeComparison, &monthly(), &options);
    let (tx, rx) = oneshot::channel::<Option<ChartInputData>>();

    block_on(async {
        let refresh = studio.create_when_ready(
            "chartA",
            ChartKind::TimeComparison,
            async { rx.await.ok().flatten() },
            &options,
        );
        futures::pin_mut!(refresh);
        assert!(futures::poll!(refresh.as_mut()).is_pending());

        studio.resize_all();
        assert!(studio
            .create("chartA", ChartKind::TimeComparison, &monthly(), &options)
            .is_some());

        tx.send(Some(monthly())).unwrap();
        refresh.await;
    });

    assert_eq!(backend.live_on("chartA"), 1);
    assert_eq!(backend.instantiations(), 2);
}

#[test]
fn refresh_from_one_shared_load_draws_each_canvas_once() {
    let studio = studio();
    let backend = studio.backend().clone();
    let options = opts();
    let (tx, rx) = oneshot::channel::<Option<ChartInputData>>();
    let source = ChartSource::pending(1, async { rx.await.ok().flatten() });

    let refresh = |canvas| {
        studio.create_when_ready(canvas, ChartKind::TimeComparison, source.clone().load(), &options)
    };

    block_on(async {
        let a = refresh("chartA");
        let b = refresh("chartB");
        // A second refresh of chartA while the first still waits on the load.
        let again = refresh("chartA");
        futures::pin_mut!(a, b, again);
        assert!(futures::poll!(a.as_mut()).is_pending());
        assert!(futures::poll!(b.as_mut()).is_pending());
        assert!(again.await.is_none());

        tx.send(Some(monthly())).unwrap();
        assert!(a.await.is_some());
        assert!(b.await.is_some());
    });

    assert_eq!(backend.instantiations(), 2);
    assert_eq!(backend.live_on("chartA"), 1);
    assert_eq!(backend.live_on("chartB"), 1);
    assert!(matches!(source.peek(), Some(Some(_))));
    assert!(!studio.is_in_flight("chartA") && !studio.is_in_flight("chartB"));
}

#[test]
fn failed_refresh_keeps_the_drawn_chart() {
    let studio = studio();
    let options = opts();
    studio.create("chartA", ChartKind::TimeComparison, &monthly(), &options);
    let before = studio.handle("chartA");

    let failed = ChartSource::ready(2, None);
    let result = block_on(studio.create_when_ready(
        "chartA",
        ChartKind::TimeComparison,
        failed.load(),
        &options,
    ));

    assert!(result.is_none());
    assert_eq!(studio.handle("chartA"), before);
    assert_eq!(studio.backend().live_on("chartA"), 1);
}

#[test]
fn reentrant_create_during_construction_is_safe() {
    let studio = studio();
    let backend = studio.backend().clone();
    let nested_calls = Rc::new(Cell::new(0));

    {
        let studio = studio.clone();
        let nested_calls = Rc::clone(&nested_calls);
        backend.on_instantiate(move |canvas| {
            if canvas != "chartA" || nested_calls.get() > 0 {
                return;
            }
            nested_calls.set(nested_calls.get() + 1);
            // Same canvas: refused by the guard. Other canvas: created normally.
            assert!(studio
                .create("chartA", ChartKind::TimeComparison, &monthly(), &ChartOptions::default())
                .is_none());
            assert!(studio
                .create("chartB", ChartKind::TimeComparison, &monthly(), &ChartOptions::default())
                .is_some());
        });
    }

    assert!(studio
        .create("chartA", ChartKind::TimeComparison, &monthly(), &opts())
        .is_some());
    assert_eq!(nested_calls.get(), 1);
    assert_eq!(backend.live_on("chartA"), 1);
    assert_eq!(backend.live_on("chartB"), 1);
    assert_eq!(studio.canvas_ids(), vec!["chartA", "chartB"]);
}

#[test]
fn conflict_recovers_and_missing_canvas_clears_marker() {
    let studio = studio();
    let backend = studio.backend().clone();
    backend.fail_next(BackendError::CanvasInUse);
    assert!(studio
        .create("chartC", ChartKind::Gauge, &ChartInputData::gauge(80.0, 0.0, 100.0), &opts())
        .is_some());
    assert_eq!(backend.resets("chartC"), 1);

    assert!(studio
        .create("nowhere", ChartKind::Gauge, &ChartInputData::gauge(1.0, 0.0, 2.0), &opts())
        .is_none());
    assert!(!studio.is_in_flight("nowhere"));
}

#[test]
fn gauge_normalization() {
    assert_eq!(normalize(50.0, 0.0, 100.0), 50.0);
    assert_eq!(normalize(150.0, 0.0, 100.0), 100.0);
    assert_eq!(normalize(5.0, 10.0, 10.0), 0.0);
    assert_eq!(normalize(-20.0, 0.0, 100.0), 0.0);
}

#[test]
fn all_zero_heatmap_has_zero_intensity() {
    let data = ChartInputData::Matrix {
        x_labels: vec!["00h".into(), "01h".into()],
        y_labels: vec!["Dom".into(), "Seg".into()],
        values: vec![vec![0.0, 0.0], vec![0.0, 0.0]],
    };
    let config = shape(ChartKind::Heatmap, &data, &opts()).unwrap();
    let Some(Paint::PerPoint(colors)) = &config.data.datasets[0].background_color else {
        panic!("expected per-point colours");
    };
    assert_eq!(colors.len(), 4);
    assert!(colors.iter().all(|c| c == "rgba(220, 53, 69, 0)"));

    let json = config.to_json().unwrap();
    assert!(!json.contains("NaN"));
    assert!(!json.contains("null"));
}

#[test]
fn radar_label_threshold() {
    let with_labels = |n: usize| ChartInputData::MultiAxis {
        labels: (0..n).map(|i| format!("D{i}")).collect(),
        datasets: vec![NamedSeries::new("Meta", vec![1.0; n])],
    };
    assert_eq!(Renderer::select(ChartKind::Radar, &with_labels(2)), Renderer::GroupedBar);
    assert_eq!(Renderer::select(ChartKind::Radar, &with_labels(3)), Renderer::Radar);

    let fallback = shape(ChartKind::Radar, &with_labels(0), &opts()).unwrap();
    assert_eq!(fallback.chart_type, ChartType::Bar);
    assert_eq!(fallback.data.labels.len(), 1);
}

#[test]
fn time_comparison_serializes_as_one_line() {
    let config = shape(ChartKind::TimeComparison, &monthly(), &opts()).unwrap();
    let value: Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
    assert_eq!(value["type"], json!("line"));
    assert_eq!(value["data"]["labels"], json!(["Jan", "Fev", "Mar"]));
    assert_eq!(value["data"]["datasets"].as_array().unwrap().len(), 1);
    assert_eq!(value["data"]["datasets"][0]["label"], json!("RNCs"));
    assert_eq!(value["data"]["datasets"][0]["data"], json!([5.0, 12.0, 8.0]));
}
