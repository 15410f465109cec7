//! End-to-end checkout: a register session scans a product into a cart,
//! encodes the transaction as a QR payload, and a tablet session scans the
//! payload and settles the payment. The two sides share nothing but the
//! transport text - exactly like the two physical devices.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reji_core::{
    Cart, Money, PaymentFlow, PaymentMethod, ProductCatalog, ProductRecord, TransactionPayload,
};
use reji_scan::{
    CaptureDevice, CaptureStream, DecodeFault, DecodedSymbol, DeviceError, Facing, Frame,
    FrameDecoder, ScanConfig, ScanDriver, ScanError, ScanHandle, ScanMode, ScanPhase, ScanSink,
    ScanValue, SymbolFormat,
};

// =============================================================================
// Test doubles
// =============================================================================

struct BlankStream {
    open: bool,
}

impl CaptureStream for BlankStream {
    fn next_frame(&mut self) -> Result<Option<Frame>, DeviceError> {
        if self.open {
            Ok(Some(Frame::blank(640, 480)))
        } else {
            Err(DeviceError::Unavailable("stream closed".into()))
        }
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

struct FakeCamera;

impl CaptureDevice for FakeCamera {
    fn open(&self, _facing: Facing) -> Result<Box<dyn CaptureStream>, DeviceError> {
        Ok(Box::new(BlankStream { open: true }))
    }
}

/// Decoder that finds the given symbol on its first frame, then idles.
struct OneShotDecoder {
    symbol: Option<DecodedSymbol>,
}

impl OneShotDecoder {
    fn new(text: &str, format: SymbolFormat) -> Box<Self> {
        Box::new(OneShotDecoder {
            symbol: Some(DecodedSymbol::new(text, format)),
        })
    }

    fn blind() -> Box<Self> {
        Box::new(OneShotDecoder { symbol: None })
    }
}

impl FrameDecoder for OneShotDecoder {
    fn decode_frame(&mut self, _frame: &Frame) -> Result<Option<DecodedSymbol>, DecodeFault> {
        Ok(self.symbol.take())
    }

    fn reset(&mut self) {
        self.symbol = None;
    }
}

/// Sink capturing the accepted value and the callback trail.
#[derive(Default)]
struct CapturingSink {
    accepted: Mutex<Option<ScanValue>>,
    timed_out: Mutex<bool>,
    closed: Mutex<bool>,
}

impl CapturingSink {
    fn accepted(&self) -> Option<ScanValue> {
        self.accepted.lock().unwrap().clone()
    }
}

impl ScanSink for CapturingSink {
    fn on_accepted(&self, value: ScanValue) {
        *self.accepted.lock().unwrap() = Some(value);
    }

    fn on_closed(&self) {
        *self.closed.lock().unwrap() = true;
    }

    fn on_timed_out(&self) {
        *self.timed_out.lock().unwrap() = true;
    }

    fn on_error(&self, _error: &ScanError) {}
}

/// The store's catalog with exactly one product on the shelf.
struct TeaCatalog;

impl ProductCatalog for TeaCatalog {
    fn lookup_product(&self, code: &str) -> Option<ProductRecord> {
        (code == "4901234567894").then(|| ProductRecord {
            id: "PRD-1".into(),
            code: code.into(),
            name: "茶".into(),
            price: 150,
        })
    }

    fn lookup_ec_stock(&self, _code: &str) -> Option<reji_core::EcStockRecord> {
        None
    }
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("reji_scan=debug")
        .try_init();
}

async fn wait_phase(handle: &ScanHandle, phase: ScanPhase) {
    let mut rx = handle.watch_phase();
    rx.wait_for(|p| *p == phase).await.unwrap();
}

// =============================================================================
// Scenarios
// =============================================================================

/// Register scans 茶 at ¥150 × 2 → subtotal 300, tax 30, total 330; the
/// payload round-trips through the optical transport; the tablet settles
/// cash 500 → change 170.
#[tokio::test(start_paused = true)]
async fn two_device_checkout() {
    init_logging();
    let catalog = TeaCatalog;

    // ---- Register device: scan the product barcode ----
    let register_sink = Arc::new(CapturingSink::default());
    let register = ScanDriver::spawn(
        &FakeCamera,
        OneShotDecoder::new("4901234567894", SymbolFormat::Ean13),
        register_sink.clone(),
        ScanMode::Product,
        false,
        ScanConfig::default(),
    )
    .unwrap();

    register.start().await.unwrap();
    wait_phase(&register, ScanPhase::Confirming).await;
    register.confirm().await.unwrap();
    wait_phase(&register, ScanPhase::Succeeded).await;

    let code = match register_sink.accepted() {
        Some(ScanValue::Code(code)) => code,
        other => panic!("expected a product code, got {other:?}"),
    };
    register.close().await;

    // ---- Register device: catalog lookup and cart ----
    let product = catalog.lookup_product(&code).expect("product on shelf");
    let mut cart = Cart::new();
    cart.add_product(&product).unwrap();
    cart.set_quantity(&product.code, 2).unwrap();

    assert_eq!(cart.subtotal().yen(), 300);
    assert_eq!(cart.tax().yen(), 30);
    assert_eq!(cart.total().yen(), 330);

    // ---- Register device: encode and render the checkout QR ----
    let payload = TransactionPayload::from_cart(&cart);
    let transport_text = reji_codec::transport::encode(&payload).unwrap();
    let png = reji_codec::render::render_png(
        &transport_text,
        reji_codec::RenderOptions::default(),
    )
    .unwrap();
    assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);

    // ---- Tablet device: scan the QR (autostart, no confirmation) ----
    let tablet_sink = Arc::new(CapturingSink::default());
    let tablet = ScanDriver::spawn(
        &FakeCamera,
        OneShotDecoder::new(&transport_text, SymbolFormat::QrCode),
        tablet_sink.clone(),
        ScanMode::Qr,
        true,
        ScanConfig::default(),
    )
    .unwrap();

    wait_phase(&tablet, ScanPhase::Succeeded).await;
    let scanned_text = match tablet_sink.accepted() {
        Some(ScanValue::Payload(text)) => text,
        other => panic!("expected a payload, got {other:?}"),
    };
    tablet.close().await;

    // ---- Tablet device: decode and settle ----
    let received = reji_codec::transport::decode(&scanned_text).unwrap();
    assert_eq!(received, payload);
    assert_eq!(received.derived_subtotal().yen(), 300);
    assert_eq!(received.derived_tax().yen(), 30);

    let mut payment = PaymentFlow::new(received);
    payment.set_tendered(Money::from_yen(500)).unwrap();
    let summary = payment.complete().unwrap();

    assert_eq!(summary.total.yen(), 330);
    assert_eq!(summary.change.yen(), 170);
    assert_eq!(summary.method, PaymentMethod::Cash);
    assert!(summary.transaction_id.starts_with("TXN-"));
}

/// A tablet that never sees a QR gives up by itself: 10 units of scanning,
/// 2 units of banner, then the timeout callback and teardown.
#[tokio::test(start_paused = true)]
async fn tablet_gives_up_without_a_payload() {
    init_logging();

    let sink = Arc::new(CapturingSink::default());
    let tablet = ScanDriver::spawn(
        &FakeCamera,
        OneShotDecoder::blind(),
        sink.clone(),
        ScanMode::Qr,
        true,
        ScanConfig::default(),
    )
    .unwrap();

    let started = tokio::time::Instant::now();
    wait_phase(&tablet, ScanPhase::Cancelled).await;

    assert!(started.elapsed() >= Duration::from_secs(12));
    assert!(*sink.timed_out.lock().unwrap());
    assert!(sink.accepted().is_none());
}

/// A malformed QR decodes on the scan side but is rejected by the codec;
/// the payment flow is never constructed.
#[tokio::test(start_paused = true)]
async fn tablet_rejects_malformed_payload() {
    init_logging();

    let sink = Arc::new(CapturingSink::default());
    let tablet = ScanDriver::spawn(
        &FakeCamera,
        OneShotDecoder::new("this is not a transaction", SymbolFormat::QrCode),
        sink.clone(),
        ScanMode::Qr,
        true,
        ScanConfig::default(),
    )
    .unwrap();

    wait_phase(&tablet, ScanPhase::Succeeded).await;
    tablet.close().await;

    let scanned_text = match sink.accepted() {
        Some(ScanValue::Payload(text)) => text,
        other => panic!("expected a payload, got {other:?}"),
    };
    assert!(matches!(
        reji_codec::transport::decode(&scanned_text),
        Err(reji_codec::CodecError::Malformed(_))
    ));
}
