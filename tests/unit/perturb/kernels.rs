use super::*;
use crate::kernel::SortPolicy;

#[test]
fn kernels_follow_settings() {
    let mut s = RenderSettings::default();
    s.set_aa_kernel(KernelConfig {
        count: 16,
        sort: SortPolicy::RadiusAscending,
    });
    let k = KernelSet::from_settings(&s);
    assert_eq!(k.aa().len(), 16);
    assert_eq!(k.aa().domain(), KernelDomain::Square);
    assert_eq!(k.dof().domain(), KernelDomain::UNIT_DISC);
    assert!(k.light().points().iter().all(|p| p.length() <= 1.0));
}

#[test]
fn sync_only_touches_changed_kernels() {
    let mut s = RenderSettings::default();
    let mut k = KernelSet::from_settings(&s);
    let dof_before = k.dof().clone();
    assert!(!k.sync(&s));

    s.set_aa_kernel(KernelConfig {
        count: 8,
        sort: SortPolicy::RadiusAscending,
    });
    assert!(k.sync(&s));
    assert_eq!(k.aa().len(), 8);
    assert_eq!(k.dof(), &dof_before);
    assert!(!k.sync(&s));
}
