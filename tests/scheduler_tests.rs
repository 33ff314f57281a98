use quickprint::scheduler::{
    Allocation, JobRegistry, JobStatus, PolicyKind, PrintJob, PrioritySjnPolicy,
    RoundRobinPolicy, SchedulingPolicy,
};
use quickprint::PrintError;
use rand::Rng;

/// Apply every allocation a policy makes, returning them in order.
fn drain(policy: &mut dyn SchedulingPolicy, jobs: &mut [PrintJob]) -> Vec<Allocation> {
    let mut trace = Vec::new();
    while let Some(alloc) = policy.next_allocation(jobs) {
        for _ in 0..alloc.pages {
            jobs[alloc.job_index].print_page();
        }
        trace.push(alloc);
    }
    trace
}

fn random_jobs(rng: &mut impl Rng, count: usize) -> Vec<PrintJob> {
    (0..count)
        .map(|i| {
            let id = i as u64 + 1;
            PrintJob::new(
                id,
                format!("doc-{}", id),
                rng.gen_range(1..=40),
                rng.gen_range(1..=4),
            )
            .unwrap()
        })
        .collect()
}

#[test]
fn test_registry_assigns_sequential_ids() {
    let mut registry = JobRegistry::new();

    let a = registry.add_job("a.pdf", 3, 1).unwrap();
    let b = registry.add_job("b.pdf", 5, 2).unwrap();

    assert_eq!(a.id(), 1);
    assert_eq!(b.id(), 2);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.total_pages(), 8);
    assert_eq!(registry.get_job(2).unwrap().name(), "b.pdf");
}

#[test]
fn test_registry_ids_not_reused_after_clear() {
    let mut registry = JobRegistry::new();
    registry.add_job("a.pdf", 3, 1).unwrap();
    registry.add_job("b.pdf", 3, 1).unwrap();

    assert_eq!(registry.clear(), 2);
    assert!(registry.is_empty());

    let c = registry.add_job("c.pdf", 1, 1).unwrap();
    assert_eq!(c.id(), 3);
}

#[test]
fn test_registry_rejects_invalid_job_without_consuming_id() {
    let mut registry = JobRegistry::new();

    let err = registry.add_job("blank.pdf", 0, 1).unwrap_err();
    assert!(matches!(err, PrintError::InvalidJobDefinition(_)));
    assert!(registry.is_empty());

    let job = registry.add_job("real.pdf", 2, 1).unwrap();
    assert_eq!(job.id(), 1);
}

#[test]
fn test_registry_capacity() {
    let mut registry = JobRegistry::with_capacity(1);
    registry.add_job("a.pdf", 1, 1).unwrap();
    assert!(registry.is_full());
    assert!(registry.add_job("b.pdf", 1, 1).is_err());
}

#[test]
fn test_snapshot_is_independent_copy() {
    let mut registry = JobRegistry::new();
    registry.add_job("a.pdf", 2, 1).unwrap();

    let mut snapshot = registry.snapshot();
    snapshot[0].print_page();

    assert_eq!(snapshot[0].status(), JobStatus::Printing);
    assert_eq!(registry.all_jobs()[0].remaining_pages(), 2);
    assert_eq!(registry.all_jobs()[0].status(), JobStatus::Queued);
}

#[test]
fn test_priority_sjn_example_order() {
    let mut jobs = vec![
        PrintJob::new(1, "a", 5, 2).unwrap(),
        PrintJob::new(2, "b", 3, 1).unwrap(),
    ];
    let trace = drain(&mut PrioritySjnPolicy::new(), &mut jobs);
    let ids: Vec<u64> = trace.iter().map(|a| a.job_id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn test_round_robin_example_allocations() {
    let mut jobs = vec![
        PrintJob::new(1, "a", 12, 1).unwrap(),
        PrintJob::new(2, "b", 5, 1).unwrap(),
    ];
    let trace = drain(&mut RoundRobinPolicy::new(10).unwrap(), &mut jobs);
    let pairs: Vec<(u64, u32)> = trace.iter().map(|a| (a.job_id, a.pages)).collect();
    assert_eq!(pairs, vec![(1, 10), (2, 5), (1, 2)]);
}

#[test]
fn test_priority_sjn_order_is_sorted_and_stable() {
    let mut rng = rand::thread_rng();

    for _ in 0..200 {
        let count = rng.gen_range(0..12);
        let mut jobs = random_jobs(&mut rng, count);
        let trace = drain(&mut PrioritySjnPolicy::new(), &mut jobs);

        assert_eq!(trace.len(), jobs.len());
        for pair in trace.windows(2) {
            let (a, b) = (&jobs[pair[0].job_index], &jobs[pair[1].job_index]);
            let (ka, kb) = ((a.priority(), a.total_pages()), (b.priority(), b.total_pages()));
            assert!(ka <= kb, "order broken: {:?} before {:?}", ka, kb);
            if ka == kb {
                assert!(a.id() < b.id(), "tie did not keep submission order");
            }
        }
        assert!(jobs.iter().all(PrintJob::is_complete));
    }
}

#[test]
fn test_round_robin_respects_slice_and_finishes_every_job() {
    let mut rng = rand::thread_rng();

    for _ in 0..200 {
        let count = rng.gen_range(0..10);
        let slice = rng.gen_range(1..=12);
        let mut jobs = random_jobs(&mut rng, count);
        let totals: Vec<u32> = jobs.iter().map(|j| j.total_pages()).collect();

        let mut policy = RoundRobinPolicy::new(slice).unwrap();
        let trace = drain(&mut policy, &mut jobs);

        let mut granted = vec![0u32; jobs.len()];
        for alloc in &trace {
            assert!(alloc.pages >= 1 && alloc.pages <= slice);
            granted[alloc.job_index] += alloc.pages;
        }
        assert_eq!(granted, totals);
        assert!(jobs.iter().all(|j| j.remaining_pages() == 0));
    }
}

#[test]
fn test_round_robin_gives_every_unfinished_job_a_turn_per_sweep() {
    let mut jobs = vec![
        PrintJob::new(1, "long", 30, 1).unwrap(),
        PrintJob::new(2, "short", 4, 1).unwrap(),
        PrintJob::new(3, "medium", 15, 1).unwrap(),
    ];
    let trace = drain(&mut RoundRobinPolicy::new(5).unwrap(), &mut jobs);
    let ids: Vec<u64> = trace.iter().map(|a| a.job_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 1, 3, 1, 3, 1, 1, 1]);
}

#[test]
fn test_policy_kind_builds_matching_policy() {
    for kind in [PolicyKind::PrioritySjn, PolicyKind::RoundRobin] {
        let policy = kind.build(10).unwrap();
        assert_eq!(policy.kind(), kind);
    }
}
