use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mdp_decoder::{Mdp3Message, MessageReader, PacketDecoder, TextRenderer};
use mdp_encoder::PacketEncoder;
use mdp_tests::{
    book_encoder, captured_message, captured_packet, read_everything, trade_summary_encoder,
};
use mdp_types::TemplateRegistry;

fn bench_captured_packet(c: &mut Criterion) {
    let packet = captured_packet();
    let decoder = PacketDecoder::mdp3();

    c.bench_function("decode_captured_packet", |b| {
        b.iter(|| {
            let decoded = decoder.decode_packet(&packet).unwrap();
            read_everything(&decoded.messages[0].reader).unwrap()
        });
    });
}

fn bench_typed_access(c: &mut Criterion) {
    let message = captured_message();
    let registry = TemplateRegistry::mdp3();

    c.bench_function("typed_security_id", |b| {
        b.iter(|| {
            let reader = MessageReader::wrap(&message, &registry).unwrap();
            let Some(Mdp3Message::LimitsBanding(view)) = Mdp3Message::from_reader(reader) else {
                unreachable!()
            };
            view.entries()
                .unwrap()
                .map(|e| e.security_id().unwrap())
                .sum::<i32>()
        });
    });
}

fn bench_packet_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_packet");

    for messages in [1usize, 8, 32] {
        let mut packet = PacketEncoder::new(1, 2);
        for i in 0..messages {
            let message = if i % 2 == 0 {
                book_encoder(13).encode().unwrap()
            } else {
                trade_summary_encoder(13).encode().unwrap()
            };
            packet.push(message);
        }
        let bytes = packet.encode().unwrap();
        let decoder = PacketDecoder::mdp3();

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(messages), &bytes, |b, bytes| {
            b.iter(|| {
                let decoded = decoder.decode_packet(bytes).unwrap();
                decoded
                    .messages
                    .iter()
                    .map(|m| read_everything(&m.reader).unwrap())
                    .sum::<usize>()
            });
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let message = captured_message();
    let registry = TemplateRegistry::mdp3();
    let reader = MessageReader::wrap(&message, &registry).unwrap();

    c.bench_function("render_captured", |b| {
        b.iter(|| TextRenderer::render(&reader).unwrap());
    });
}

criterion_group!(
    benches,
    bench_captured_packet,
    bench_typed_access,
    bench_packet_sizes,
    bench_render
);
criterion_main!(benches);
