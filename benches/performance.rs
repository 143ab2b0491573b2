//! Performance benchmarks for the content store.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use postwire::{
    CreateCommentInput, CreatePostInput, CreateUserInput, MutationKind, Post, PostId, Store,
    StoreConfig, StoreEvent, SubscriptionConfig, Topic, TopicRouter, UpdatePostInput, UserId,
};

fn create_store() -> Store {
    Store::new(StoreConfig {
        subscriptions: SubscriptionConfig::unbounded(),
        seed_demo_data: true,
    })
}

fn sample_event() -> StoreEvent {
    StoreEvent::post(
        MutationKind::Updated,
        Post {
            id: PostId::from("001"),
            title: "My first post".to_string(),
            body: "This is my first post.".to_string(),
            published: true,
            author: UserId::from("4"),
        },
    )
}

/// Benchmark publish fan-out with varying subscriber counts
fn bench_publish_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_fan_out");

    for subscribers in [1, 10, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("subscribers", subscribers),
            &subscribers,
            |b, &count| {
                let router = TopicRouter::with_config(SubscriptionConfig::unbounded());
                let handles: Vec<_> = (0..count).map(|_| router.subscribe(Topic::posts())).collect();
                let event = sample_event();

                b.iter(|| {
                    black_box(router.publish(&Topic::posts(), event.clone()));
                    for handle in &handles {
                        while handle.try_recv().is_ok() {}
                    }
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the post visibility round trip with one live subscriber
fn bench_post_visibility_toggle(c: &mut Criterion) {
    let store = create_store();
    let feed = store.subscriptions().subscribe_to_posts();
    let post = PostId::from("001");

    c.bench_function("post_visibility_toggle", |b| {
        b.iter(|| {
            store
                .mutations()
                .update_post(&post, UpdatePostInput::new().with_published(false))
                .unwrap();
            store
                .mutations()
                .update_post(&post, UpdatePostInput::new().with_published(true))
                .unwrap();
            black_box(feed.drain());
        });
    });
}

/// Benchmark user deletion cascades with varying amounts of content
fn bench_delete_user_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete_user_cascade");

    for posts in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("posts", posts), &posts, |b, &count| {
            b.iter_batched(
                || {
                    let store = create_store();
                    let user = store
                        .mutations()
                        .create_user(CreateUserInput::new("Bench", "bench@example.com"))
                        .unwrap();
                    for i in 0..count {
                        let post = store
                            .mutations()
                            .create_post(CreatePostInput::new(
                                format!("post {}", i),
                                "",
                                true,
                                user.id.clone(),
                            ))
                            .unwrap();
                        store
                            .mutations()
                            .create_comment(CreateCommentInput::new(
                                "comment",
                                UserId::from("1"),
                                post.id,
                            ))
                            .unwrap();
                    }
                    (store, user.id)
                },
                |(store, user)| {
                    black_box(store.mutations().delete_user(&user).unwrap());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_publish_fan_out,
    bench_post_visibility_toggle,
    bench_delete_user_cascade
);
criterion_main!(benches);
