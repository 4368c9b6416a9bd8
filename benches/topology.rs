use criterion::{black_box, criterion_group, criterion_main, Criterion};

use glimmerglass_l1::addressing::{AddressingScheme, LogicalAddressing, PhysicalAddressing};
use glimmerglass_l1::tl1::parser::{parse_connections, parse_ports};
use glimmerglass_l1::topology::PortCatalog;

const PORTS: usize = 192;

fn port_block() -> String {
    (1..=PORTS as u32)
        .flat_map(|n| {
            let ingress = format!("PORTID={},PORTNAME=IN{},PORTDIR=input", 10000 + n, n);
            let egress = format!("PORTID={},PORTNAME=OUT{},PORTDIR=output", 20000 + n, n);
            [
                format!("   \"{},PORTHEALTH=good\"", ingress),
                format!("   \"{},PORTHEALTH=good\"", egress),
            ]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn crs_block() -> String {
    (1..=PORTS as u32)
        .map(|n| {
            let peer = PORTS as u32 + 1 - n;
            let ingress = format!("IPORTID={},IPORTNAME=IN{},IPORTDIR=input", 10000 + n, n);
            let egress = format!("OPORTID={},OPORTNAME=OUT{},OPORTDIR=output", 20000 + peer, peer);
            format!("   \"{},{}\"", ingress, egress)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_port_view(c: &mut Criterion) {
    let ports = port_block();
    let crs = crs_block();

    c.bench_function("physical port view", |b| {
        b.iter(|| {
            let catalog = PortCatalog::build(parse_ports(black_box(&ports)));
            let records: Vec<_> = parse_connections(black_box(&crs)).collect();
            PhysicalAddressing.port_view(&catalog, &records)
        })
    });

    let logical = LogicalAddressing::default();
    c.bench_function("logical port view", |b| {
        b.iter(|| {
            let catalog = PortCatalog::build(parse_ports(black_box(&ports)));
            let records: Vec<_> = parse_connections(black_box(&crs)).collect();
            logical.port_view(&catalog, &records)
        })
    });
}

criterion_group!(benches, bench_port_view);
criterion_main!(benches);
