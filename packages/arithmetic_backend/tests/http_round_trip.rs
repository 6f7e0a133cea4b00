use std::sync::Arc;

use arithmetic_backend::{HttpArithmetic, serve};
use calc_core::{ArithmeticError, ArithmeticService, Key, spawn_session};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Start a backend on an ephemeral port. Dropping the sender stops it.
async fn start_backend() -> (String, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        serve(listener, async {
            let _ = shutdown_rx.await;
        })
        .await
        .unwrap();
    });
    (format!("http://{addr}"), shutdown_tx)
}

#[tokio::test]
async fn client_talks_to_server() {
    let (url, _shutdown) = start_backend().await;
    let client = HttpArithmetic::new(url);

    assert_eq!(client.add(5.0, 3.0).await, Ok(8.0));
    assert_eq!(client.subtract(5.0, 3.0).await, Ok(2.0));
    assert_eq!(client.multiply(9.0, 2.0).await, Ok(18.0));
    assert_eq!(client.divide(1.0, 4.0).await, Ok(0.25));
}

#[tokio::test]
async fn division_by_zero_crosses_the_wire() {
    let (url, _shutdown) = start_backend().await;
    let client = HttpArithmetic::new(url);

    assert_eq!(
        client.divide(6.0, 0.0).await,
        Err(ArithmeticError::DivisionByZero)
    );
    assert_eq!(client.divide(0.0, 6.0).await, Ok(0.0));
}

#[tokio::test]
async fn non_finite_values_cross_the_wire() {
    let (url, _shutdown) = start_backend().await;
    let client = HttpArithmetic::new(url);

    assert_eq!(client.multiply(1e200, 1e200).await, Ok(f64::INFINITY));
    assert_eq!(client.subtract(f64::NEG_INFINITY, 1.0).await, Ok(f64::NEG_INFINITY));
    assert!(client.add(f64::NAN, 1.0).await.unwrap().is_nan());
}

#[tokio::test]
async fn unreachable_backend_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpArithmetic::new(format!("http://{addr}"));
    let err = client.add(1.0, 2.0).await.unwrap_err();
    assert!(matches!(err, ArithmeticError::Unavailable(_)), "{err:?}");
}

#[tokio::test]
async fn session_over_http() {
    let (url, _shutdown) = start_backend().await;
    let session = spawn_session(Arc::new(HttpArithmetic::new(url)));

    let mut last = None;
    for label in ["9", "*", "2", "+", "1", "="] {
        let key: Key = label.parse().unwrap();
        last = Some(session.press_settled(key).await.unwrap());
    }
    assert_eq!(last.unwrap().state.display, "19");

    session.press(Key::Clear).await.unwrap();
    for label in ["6", "/", "0"] {
        session.press_settled(label.parse().unwrap()).await.unwrap();
    }
    let snapshot = session.press_settled(Key::Equals).await.unwrap();
    assert_eq!(snapshot.state.display, "NaN");

    session.press(Key::Clear).await.unwrap();
    let big = format!("1{}", "0".repeat(200));
    for label in big.chars().map(String::from).chain(["*".to_string()]) {
        session.press_settled(label.parse().unwrap()).await.unwrap();
    }
    for label in big.chars().map(String::from) {
        session.press_settled(label.parse().unwrap()).await.unwrap();
    }
    let snapshot = session.press_settled(Key::Equals).await.unwrap();
    assert_eq!(snapshot.state.display, "Infinity");
}
